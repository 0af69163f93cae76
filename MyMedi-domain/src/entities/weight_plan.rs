use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::bmi::BmiCategory;

/// Weight loss questionnaire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct WeightPlanRequest {
    pub name: String,
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: u32,
    pub gender: String,
    /// Centimetres
    #[validate(range(min = 50.0, max = 272.0, message = "Height must be between 50 and 272 cm"))]
    pub height: f64,
    /// Kilograms
    #[validate(range(min = 20.0, max = 500.0, message = "Current weight must be between 20 and 500 kg"))]
    pub current_weight: f64,
    #[validate(range(min = 20.0, max = 500.0, message = "Target weight must be between 20 and 500 kg"))]
    pub target_weight: f64,
    pub health_conditions: Vec<String>,
    pub medications: String,
    /// `sedentary`, `light`, `moderate`, `active` or `very-active`
    pub activity_level: String,
    pub diet_preference: String,
    pub cuisine_preference: String,
    pub sleep_hours: Option<f64>,
    pub timeframe: String,
    pub primary_goal: String,
}

impl WeightPlanRequest {
    pub fn has_condition(&self, condition: &str) -> bool {
        self.health_conditions.iter().any(|c| c == condition)
    }

    pub fn is_vegetarian(&self) -> bool {
        matches!(self.diet_preference.as_str(), "vegetarian" | "vegan")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub enum PlanRiskLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct BmiSummary {
    pub current: f64,
    pub target: f64,
    pub category: BmiCategory,
    pub risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CaloriePlan {
    pub bmr: f64,
    pub tdee: f64,
    pub deficit: f64,
    pub target_daily: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct Milestone {
    pub week: u32,
    pub weight: f64,
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Kilograms per week
    pub weekly_loss: f64,
    pub estimated_weeks: u32,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub breakfast: Vec<String>,
    pub mid_morning: Vec<String>,
    pub lunch: Vec<String>,
    pub evening: Vec<String>,
    pub dinner: Vec<String>,
    pub bedtime: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExercisePlan {
    pub cardio: Vec<String>,
    pub strength: Vec<String>,
    pub flexibility: Vec<String>,
    pub schedule: String,
    pub gym_exercises: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct PlanRiskAssessment {
    pub level: PlanRiskLevel,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct FollowUpPlan {
    pub schedule: String,
    pub tests: Vec<String>,
    pub consultations: Vec<String>,
}

/// Personalised weight loss plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct WeightPlan {
    pub bmi: BmiSummary,
    pub calories: CaloriePlan,
    pub timeline: Timeline,
    pub diet_plan: DietPlan,
    pub exercise_plan: ExercisePlan,
    pub supplements: Vec<String>,
    pub tips: Vec<String>,
    pub risk_assessment: PlanRiskAssessment,
    pub follow_up: FollowUpPlan,
}
