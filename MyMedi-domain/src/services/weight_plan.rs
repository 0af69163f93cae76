use tracing::{debug, warn};
use validator::Validate;

use crate::entities::weight_plan::{
    BmiSummary, CaloriePlan, DietPlan, ExercisePlan, FollowUpPlan, Milestone, PlanRiskAssessment,
    PlanRiskLevel, Timeline, WeightPlan, WeightPlanRequest,
};
use crate::error::ServiceError;
use super::bmi::{calculate_bmi, round1, BmiCategory};

/// Kilocalories in a kilogram of body fat
const KCAL_PER_KG: f64 = 7700.0;
const MAX_DAILY_DEFICIT: f64 = 500.0;

const FOLLOW_UP_TESTS: [&str; 8] = [
    "Complete Blood Count (CBC)",
    "Lipid Profile (Cholesterol, Triglycerides)",
    "Blood Sugar (Fasting & Post-meal)",
    "Liver Function Test (LFT)",
    "Kidney Function Test (KFT)",
    "Thyroid Function Test (TSH, T3, T4)",
    "Vitamin D3 and B12 levels",
    "HbA1c (if diabetic)",
];

const FOLLOW_UP_CONSULTATIONS: [&str; 6] = [
    "Registered Dietitian consultation",
    "Certified fitness trainer guidance",
    "Regular physician check-ups",
    "Endocrinologist (if diabetic/thyroid issues)",
    "Cardiologist (if heart conditions)",
    "Mental health counselor (if needed)",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Harris-Benedict basal metabolic rate in kcal/day
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u32, gender: &str) -> f64 {
    let age = f64::from(age);
    if gender == "male" {
        88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age
    } else {
        447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.33 * age
    }
}

pub fn activity_multiplier(level: &str) -> f64 {
    match level {
        "light" => 1.375,
        "moderate" => 1.55,
        "active" => 1.725,
        "very-active" => 1.9,
        _ => 1.2,
    }
}

fn milestone_goal(week: u32) -> &'static str {
    match week {
        0..=4 => "Initial adaptation and habit formation",
        5..=8 => "Metabolic adjustment and visible changes",
        9..=12 => "Significant progress and lifestyle integration",
        13..=16 => "Advanced progress and body composition changes",
        _ => "Maintenance preparation and goal achievement",
    }
}

/// One milestone every two weeks up to the estimated end of the plan
pub fn milestones(weeks: u32, start_weight: f64, weekly_loss: f64) -> Vec<Milestone> {
    (2..=weeks)
        .step_by(2)
        .map(|week| Milestone {
            week,
            weight: round1(start_weight - weekly_loss * f64::from(week)),
            goal: milestone_goal(week).to_string(),
        })
        .collect()
}

pub fn risk_assessment(request: &WeightPlanRequest, bmi: f64) -> PlanRiskAssessment {
    let mut level = PlanRiskLevel::Low;
    let mut factors = Vec::new();
    let mut recommendations = Vec::new();

    if bmi > 30.0 {
        level = PlanRiskLevel::High;
        factors.push("Obesity (BMI > 30)".to_string());
        recommendations.push("Medical supervision recommended".to_string());
    } else if bmi > 25.0 {
        level = PlanRiskLevel::Moderate;
        factors.push("Overweight (BMI 25-30)".to_string());
    }

    if request.has_condition("Diabetes") {
        level = PlanRiskLevel::High;
        factors.push("Diabetes mellitus".to_string());
        recommendations.push("Regular blood glucose monitoring required".to_string());
    }

    if request.has_condition("Heart Disease") {
        level = PlanRiskLevel::High;
        factors.push("Cardiovascular disease".to_string());
        recommendations.push("Cardiac clearance needed before exercise".to_string());
    }

    if request.has_condition("Hypertension") {
        level = match level {
            PlanRiskLevel::Low => PlanRiskLevel::Moderate,
            _ => PlanRiskLevel::High,
        };
        factors.push("High blood pressure".to_string());
        recommendations.push("Monitor BP regularly during weight loss".to_string());
    }

    if request.age > 60 {
        if level == PlanRiskLevel::Low {
            level = PlanRiskLevel::Moderate;
        }
        factors.push("Age over 60".to_string());
        recommendations.push("Gradual exercise progression recommended".to_string());
    }

    PlanRiskAssessment { level, factors, recommendations }
}

pub fn diet_plan(request: &WeightPlanRequest) -> DietPlan {
    let veg = request.is_vegetarian();
    let cuisine = if request.cuisine_preference.is_empty() {
        "north-indian"
    } else {
        request.cuisine_preference.as_str()
    };
    let pick = |cond: bool, yes: &str, no: &str| if cond { yes.to_string() } else { no.to_string() };
    let south = cuisine == "south-indian";
    let gujarati = cuisine == "gujarati";

    DietPlan {
        breakfast: vec![
            format!("{} (280-320 cal)", pick(south, "Idli with sambar", "Oats with fruits")),
            format!("{} (250-290 cal)", pick(gujarati, "Dhokla with chutney", "Vegetable poha")),
            format!("{} with vegetables (260-300 cal)", pick(veg, "Moong dal chilla", "Egg white omelet")),
            format!("{} (240-280 cal)", pick(south, "Upma with vegetables", "Whole wheat toast")),
        ],
        mid_morning: strings(&[
            "Green tea with 6-8 almonds (85 cal)",
            "Buttermilk with mint and cumin (65 cal)",
            "Seasonal fruit (apple/guava) (80-90 cal)",
            "Coconut water with lemon (50 cal)",
        ]),
        lunch: vec![
            format!("Brown rice with {} (380-420 cal)", pick(veg, "dal and sabzi", "chicken curry")),
            format!(
                "2 whole wheat roti with {} (350-390 cal)",
                pick(cuisine == "punjabi", "rajma", "mixed vegetables")
            ),
            format!("Quinoa pulao with {} and raita (370-410 cal)", pick(veg, "paneer", "lean meat")),
            format!("{} with vegetables (340-380 cal)", pick(south, "Brown rice with rasam", "Khichdi")),
        ],
        evening: strings(&[
            "Herbal tea with 2 whole grain biscuits (105 cal)",
            "Roasted chana (chickpeas) with spices (125 cal)",
            "Green tea with handful of mixed nuts (95 cal)",
            "Vegetable soup with 1 slice multigrain bread (110 cal)",
        ]),
        dinner: vec![
            format!("Grilled {} with steamed vegetables (290-330 cal)", pick(veg, "paneer", "chicken")),
            "Dal with 1 roti and large salad (270-310 cal)".to_string(),
            format!("{} with brown rice (310-350 cal)", pick(veg, "Tofu curry", "Fish curry")),
            format!("Vegetable soup with {} (240-280 cal)", pick(gujarati, "khakhra", "whole grain bread")),
        ],
        bedtime: strings(&[
            "Warm turmeric milk with honey (105 cal)",
            "Chamomile tea (5 cal)",
            "Warm water with lemon and honey (30 cal)",
            "Herbal tea (fennel/mint) (10 cal)",
        ]),
    }
}

fn workout_schedule(activity_level: &str) -> &'static str {
    match activity_level {
        "sedentary" => {
            "Mon/Wed/Fri: Light cardio + flexibility, Tue/Thu: Strength training, Sat: Active recovery walk, Sun: Rest"
        }
        "active" | "very-active" => {
            "Mon/Wed/Fri: Strength + HIIT, Tue/Thu/Sat: Cardio + flexibility, Sun: Active recovery or light yoga"
        }
        _ => "Mon/Wed/Fri: Strength + cardio, Tue/Thu: Cardio + flexibility, Sat: Mixed workout, Sun: Rest or light activity",
    }
}

pub fn exercise_plan(request: &WeightPlanRequest) -> ExercisePlan {
    let activity = if request.activity_level.is_empty() {
        "moderate"
    } else {
        request.activity_level.as_str()
    };
    let age = if request.age == 0 { 30 } else { request.age };

    ExercisePlan {
        cardio: vec![
            format!("{} brisk walking daily", if age > 50 { "25-30 min" } else { "30-40 min" }),
            format!("{} cycling 3x/week", if activity == "sedentary" { "15-20 min" } else { "25-30 min" }),
            "20-25 min dancing/Zumba 2x/week".to_string(),
            format!("Swimming {} 2x/week", if age > 45 { "25-30 min" } else { "30-35 min" }),
            "Stair climbing 10-15 min daily".to_string(),
        ],
        strength: vec![
            "Bodyweight exercises (push-ups, squats) 3x/week".to_string(),
            "Resistance band training 20-25 min".to_string(),
            "Yoga for strength building 2x/week".to_string(),
            format!("{} weight training 2-3x/week", if activity == "active" { "Moderate" } else { "Light" }),
            "Functional training (kettlebells) 2x/week".to_string(),
        ],
        flexibility: strings(&[
            "Morning stretching routine 10-15 min",
            "Evening yoga session 20-30 min",
            "Weekend longer yoga class 45-60 min",
            "Daily mobility exercises 5-10 min",
            "Foam rolling session 2x/week",
        ]),
        schedule: workout_schedule(activity).to_string(),
        gym_exercises: strings(&[
            "Treadmill: 20-30 min moderate pace",
            "Elliptical: 15-25 min interval training",
            "Leg press: 3 sets of 12-15 reps",
            "Chest press: 3 sets of 10-12 reps",
            "Lat pulldown: 3 sets of 10-12 reps",
            "Shoulder press: 3 sets of 8-10 reps",
            "Leg curls: 3 sets of 12-15 reps",
            "Planks: 3 sets of 30-60 seconds",
            "Stationary bike: 15-20 min cool down",
        ]),
    }
}

pub fn supplements(request: &WeightPlanRequest) -> Vec<String> {
    let mut out = strings(&["Multivitamin (Revital H or Centrum)"]);
    if request.is_vegetarian() {
        out.push("Vitamin B12 supplement".to_string());
        out.push("Iron supplement (if deficient)".to_string());
    }
    if request.has_condition("Diabetes") {
        out.push("Chromium supplement (consult doctor)".to_string());
    }
    if request.age > 40 {
        out.push("Calcium + Vitamin D3".to_string());
        out.push("Omega-3 fatty acids".to_string());
    }
    out.extend(strings(&[
        "Protein powder (whey or plant-based)",
        "Green tea extract (optional)",
        "Probiotics for digestive health",
        "Magnesium for muscle recovery",
    ]));
    out
}

pub fn tips(request: &WeightPlanRequest) -> Vec<String> {
    let mut out = strings(&[
        "Drink 500ml water 30 minutes before each meal",
        "Use smaller plates (8-9 inch) to control portions naturally",
        "Include protein in every meal to maintain satiety",
    ]);
    if request.cuisine_preference == "gujarati" {
        out.push("Reduce oil in traditional preparations, use steaming/grilling".to_string());
    }
    if request.has_condition("Diabetes") {
        out.push("Monitor blood sugar before and after meals".to_string());
    }
    if request.sleep_hours.is_some_and(|h| h < 7.0) {
        out.push("Prioritize 7-8 hours of sleep for better metabolism".to_string());
    }
    out.extend(strings(&[
        "Meal prep on weekends to avoid unhealthy choices",
        "Track progress weekly, not daily to avoid fluctuations",
        "Practice mindful eating - chew slowly and avoid distractions",
        "Include fiber-rich foods to feel fuller longer",
        "Stay consistent rather than aiming for perfection",
        "Manage stress through meditation or deep breathing",
    ]));
    out
}

pub fn follow_up_plan(request: &WeightPlanRequest) -> FollowUpPlan {
    let high_risk = ["Diabetes", "Heart Disease", "Hypertension"]
        .iter()
        .any(|c| request.has_condition(c));

    FollowUpPlan {
        schedule: if high_risk { "Every 2 weeks" } else { "Monthly" }.to_string(),
        tests: strings(&FOLLOW_UP_TESTS),
        consultations: strings(&FOLLOW_UP_CONSULTATIONS),
    }
}

fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    fields
        .into_iter()
        .map(|(field, errs)| {
            let msgs: Vec<String> = errs
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, msgs.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Trait for weight loss plan generation
pub trait WeightPlanServiceTrait {
    fn validate_request(&self, request: &WeightPlanRequest) -> Result<(), ServiceError>;

    fn generate(&self, request: &WeightPlanRequest) -> Result<WeightPlan, ServiceError>;
}

pub struct WeightPlanService;

impl WeightPlanServiceTrait for WeightPlanService {
    fn validate_request(&self, request: &WeightPlanRequest) -> Result<(), ServiceError> {
        if let Err(errors) = request.validate() {
            let message = validation_message(&errors);
            warn!("Weight plan validation failed: {}", message);
            return Err(ServiceError::Validation(message));
        }

        if request.target_weight >= request.current_weight {
            return Err(ServiceError::Validation(
                "Target weight must be below current weight".to_string(),
            ));
        }

        Ok(())
    }

    fn generate(&self, request: &WeightPlanRequest) -> Result<WeightPlan, ServiceError> {
        self.validate_request(request)?;

        let weight = request.current_weight;
        let current_bmi = calculate_bmi(weight, request.height)
            .ok_or_else(|| ServiceError::Validation("Height and weight must be positive".to_string()))?;
        let target_bmi = calculate_bmi(request.target_weight, request.height)
            .ok_or_else(|| ServiceError::Validation("Height and weight must be positive".to_string()))?;
        let category = BmiCategory::from_bmi(current_bmi);

        let bmr = basal_metabolic_rate(weight, request.height, request.age, &request.gender);
        let tdee = bmr * activity_multiplier(&request.activity_level);
        let to_lose = weight - request.target_weight;
        let deficit = MAX_DAILY_DEFICIT.min(to_lose * 100.0);
        let weekly_loss = deficit * 7.0 / KCAL_PER_KG;
        // Validation guarantees a positive loss, so this is finite
        let estimated_weeks = (to_lose / weekly_loss).ceil() as u32;

        debug!(bmr, tdee, deficit, estimated_weeks, "Weight plan calculated");

        Ok(WeightPlan {
            bmi: BmiSummary {
                current: round1(current_bmi),
                target: round1(target_bmi),
                category,
                risk: category.risk().to_string(),
            },
            calories: CaloriePlan {
                bmr: bmr.round(),
                tdee: tdee.round(),
                deficit: deficit.round(),
                target_daily: (tdee - deficit).round(),
            },
            timeline: Timeline {
                weekly_loss: (weekly_loss * 100.0).round() / 100.0,
                estimated_weeks,
                milestones: milestones(estimated_weeks, weight, weekly_loss),
            },
            diet_plan: diet_plan(request),
            exercise_plan: exercise_plan(request),
            supplements: supplements(request),
            tips: tips(request),
            risk_assessment: risk_assessment(request, current_bmi),
            follow_up: follow_up_plan(request),
        })
    }
}

pub fn create_default_weight_plan_service() -> impl WeightPlanServiceTrait + Send + Sync {
    WeightPlanService
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> WeightPlanRequest {
        WeightPlanRequest {
            name: "Asha".to_string(),
            age: 35,
            gender: "female".to_string(),
            height: 160.0,
            current_weight: 80.0,
            target_weight: 66.0,
            activity_level: "moderate".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_bmr_by_gender() {
        let male = basal_metabolic_rate(80.0, 180.0, 30, "male");
        assert!((male - 1853.632).abs() < 0.01);
        let female = basal_metabolic_rate(60.0, 160.0, 30, "female");
        assert!((female - 1368.193).abs() < 0.01);
        assert_eq!(activity_multiplier("unknown"), 1.2);
    }

    #[test]
    fn test_plan_numbers() {
        let plan = WeightPlanService.generate(&request()).unwrap();

        assert!((plan.bmi.current - 31.25).abs() <= 0.05);
        assert_eq!(plan.bmi.category, BmiCategory::Obese);
        assert_eq!(plan.bmi.risk, "High");
        assert_eq!(plan.calories.deficit, 500.0);
        // 500 kcal/day is 0.4545 kg a week, so 14 kg takes 30.8 weeks
        assert_eq!(plan.timeline.weekly_loss, 0.45);
        assert_eq!(plan.timeline.estimated_weeks, 31);
        assert_eq!(plan.timeline.milestones.len(), 15);
        assert_eq!(plan.timeline.milestones[0].week, 2);
        assert_eq!(plan.timeline.milestones[0].goal, "Initial adaptation and habit formation");
        assert_eq!(plan.risk_assessment.level, PlanRiskLevel::High);
    }

    #[test]
    fn test_small_loss_caps_deficit() {
        let req = WeightPlanRequest { current_weight: 62.0, target_weight: 60.0, ..request() };
        let plan = WeightPlanService.generate(&req).unwrap();
        assert_eq!(plan.calories.deficit, 200.0);
        assert_eq!(plan.follow_up.schedule, "Monthly");
    }

    #[test]
    fn test_risk_escalation() {
        let hypertensive = WeightPlanRequest {
            health_conditions: vec!["Hypertension".to_string()],
            ..request()
        };
        let assessment = risk_assessment(&hypertensive, 22.0);
        assert_eq!(assessment.level, PlanRiskLevel::Moderate);

        let assessment = risk_assessment(&hypertensive, 27.0);
        assert_eq!(assessment.level, PlanRiskLevel::High);

        let senior = WeightPlanRequest { age: 65, ..request() };
        let assessment = risk_assessment(&senior, 22.0);
        assert_eq!(assessment.level, PlanRiskLevel::Moderate);
        assert_eq!(assessment.factors, vec!["Age over 60"]);
    }

    #[test]
    fn test_vegetarian_south_indian_menu() {
        let req = WeightPlanRequest {
            diet_preference: "vegan".to_string(),
            cuisine_preference: "south-indian".to_string(),
            sleep_hours: Some(6.0),
            ..request()
        };
        let diet = diet_plan(&req);
        assert_eq!(diet.breakfast[0], "Idli with sambar (280-320 cal)");
        assert_eq!(diet.lunch[0], "Brown rice with dal and sabzi (380-420 cal)");
        assert!(supplements(&req).contains(&"Vitamin B12 supplement".to_string()));
        assert!(tips(&req).contains(&"Prioritize 7-8 hours of sleep for better metabolism".to_string()));
    }

    #[test]
    fn test_validation_errors() {
        let bad = WeightPlanRequest { age: 0, ..request() };
        assert!(matches!(
            WeightPlanService.generate(&bad),
            Err(ServiceError::Validation(msg)) if msg.contains("Age must be between 1 and 120")
        ));

        let gain = WeightPlanRequest { target_weight: 90.0, ..request() };
        assert!(matches!(
            WeightPlanService.generate(&gain),
            Err(ServiceError::Validation(msg)) if msg == "Target weight must be below current weight"
        ));
    }
}
