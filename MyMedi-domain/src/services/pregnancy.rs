use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::entities::pregnancy::{PregnancyReport, PregnancyRequest, TrimesterProgress};
use crate::error::ServiceError;
use super::bmi::round1;

pub const FULL_TERM_WEEKS: u32 = 40;
pub const MAX_WEEK: u32 = 42;

/// Fruit-size comparisons for tabulated weeks
const BABY_SIZES: [(u32, &str); 9] = [
    (8, "Raspberry (1.6 cm)"),
    (12, "Lime (5.4 cm)"),
    (16, "Avocado (11.6 cm)"),
    (20, "Banana (16.4 cm)"),
    (24, "Ear of corn (21 cm)"),
    (28, "Eggplant (25 cm)"),
    (32, "Jicama (28 cm)"),
    (36, "Romaine lettuce (32.2 cm)"),
    (40, "Pumpkin (36.2 cm)"),
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Completed weeks since the last menstrual period.
///
/// The current day counts as started, so an LMP 13 days back is week 2.
pub fn week_from_last_period(last_period: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - last_period).num_days().unsigned_abs() + 1;
    u32::try_from(days / 7).unwrap_or(u32::MAX)
}

pub fn due_date(week: u32, today: NaiveDate) -> NaiveDate {
    let weeks_left = i64::from(FULL_TERM_WEEKS) - i64::from(week);
    today + Duration::weeks(weeks_left)
}

/// Size for the nearest tabulated week, the earlier one on a tie
pub fn baby_size(week: u32) -> &'static str {
    let mut best = BABY_SIZES[0];
    for entry in BABY_SIZES.iter().skip(1) {
        if entry.0.abs_diff(week) < best.0.abs_diff(week) {
            best = *entry;
        }
    }
    best.1
}

pub fn trimester(week: u32) -> TrimesterProgress {
    let w = f64::from(week);
    let (current, progress) = if week <= 12 {
        (1, w / 12.0 * 100.0)
    } else if week <= 28 {
        (2, (w - 12.0) / 16.0 * 100.0)
    } else {
        (3, (w - 28.0) / 12.0 * 100.0)
    };
    TrimesterProgress { current, progress: round1(progress) }
}

/// Trait for pregnancy week tracking
pub trait PregnancyServiceTrait {
    /// Resolve the current pregnancy week from the request
    fn resolve_week(&self, request: &PregnancyRequest, today: NaiveDate) -> Result<u32, ServiceError>;

    fn report_on(&self, request: &PregnancyRequest, today: NaiveDate) -> Result<PregnancyReport, ServiceError>;

    fn report(&self, request: &PregnancyRequest) -> Result<PregnancyReport, ServiceError> {
        self.report_on(request, Utc::now().date_naive())
    }
}

pub struct PregnancyService;

impl PregnancyServiceTrait for PregnancyService {
    fn resolve_week(&self, request: &PregnancyRequest, today: NaiveDate) -> Result<u32, ServiceError> {
        let week = match (request.week, request.last_period_date) {
            (Some(week), _) => week,
            (None, Some(lmp)) => week_from_last_period(lmp, today),
            (None, None) => {
                warn!("Pregnancy report without week or period date");
                return Err(ServiceError::Validation(
                    "Please provide either pregnancy week or last period date".to_string(),
                ));
            }
        };

        if !(1..=MAX_WEEK).contains(&week) {
            return Err(ServiceError::Validation(format!(
                "Pregnancy week must be between 1 and {}",
                MAX_WEEK
            )));
        }
        Ok(week)
    }

    fn report_on(&self, request: &PregnancyRequest, today: NaiveDate) -> Result<PregnancyReport, ServiceError> {
        let week = self.resolve_week(request, today)?;
        debug!(week, "Building pregnancy report");

        Ok(PregnancyReport {
            current_week: week,
            due_date: due_date(week, today),
            baby_size: baby_size(week).to_string(),
            trimester: trimester(week),
            reported_symptoms: request
                .symptoms
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            key_developments: strings(&[
                "Brain development accelerating",
                "Organs continuing to mature",
                "Movement becoming more coordinated",
                "Sensory development progressing",
            ]),
            symptoms: strings(&["Increased appetite", "Growing belly", "Possible back pain", "Frequent urination"]),
            recommendations: strings(&[
                "Take prenatal vitamins daily",
                "Stay hydrated with 8-10 glasses of water",
                "Get adequate rest and sleep",
                "Attend all prenatal appointments",
            ]),
            appointments: strings(&[
                "Monthly prenatal checkup",
                "Blood pressure monitoring",
                "Weight and growth tracking",
                "Ultrasound if scheduled",
            ]),
            nutrition: strings(&[
                "Folic acid rich foods (leafy greens)",
                "Calcium sources (dairy, almonds)",
                "Iron rich foods (lean meat, beans)",
                "Omega-3 fatty acids (fish, walnuts)",
            ]),
            exercises: strings(&[
                "Prenatal yoga",
                "Walking 30 minutes daily",
                "Swimming (if comfortable)",
                "Pelvic floor exercises",
            ]),
            warnings: strings(&["Severe abdominal pain", "Heavy bleeding", "Persistent headaches", "Sudden swelling"]),
        })
    }
}

pub fn create_default_pregnancy_service() -> impl PregnancyServiceTrait + Send + Sync {
    PregnancyService
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_from_last_period() {
        let today = date(2024, 6, 1);
        assert_eq!(week_from_last_period(date(2024, 3, 9), today), 12);
        assert_eq!(week_from_last_period(date(2024, 5, 30), today), 0);
    }

    #[test]
    fn test_week_boundary_counts_current_day() {
        let today = date(2024, 6, 1);
        assert_eq!(week_from_last_period(date(2024, 5, 19), today), 2);
        assert_eq!(week_from_last_period(date(2024, 5, 20), today), 1);
        assert_eq!(week_from_last_period(date(2024, 5, 26), today), 1);
    }

    #[test]
    fn test_baby_size_nearest_week() {
        assert_eq!(baby_size(1), "Raspberry (1.6 cm)");
        assert_eq!(baby_size(10), "Raspberry (1.6 cm)");
        assert_eq!(baby_size(11), "Lime (5.4 cm)");
        assert_eq!(baby_size(42), "Pumpkin (36.2 cm)");
    }

    #[test]
    fn test_trimester_progress() {
        assert_eq!(trimester(6), TrimesterProgress { current: 1, progress: 50.0 });
        assert_eq!(trimester(20), TrimesterProgress { current: 2, progress: 50.0 });
        assert_eq!(trimester(34), TrimesterProgress { current: 3, progress: 50.0 });
    }

    #[test]
    fn test_report_uses_explicit_week_first() {
        let today = date(2024, 6, 1);
        let request = PregnancyRequest {
            week: Some(20),
            last_period_date: Some(date(2024, 5, 1)),
            symptoms: Some("  mild nausea ".to_string()),
        };
        let report = PregnancyService.report_on(&request, today).unwrap();
        assert_eq!(report.current_week, 20);
        assert_eq!(report.due_date, date(2024, 10, 19));
        assert_eq!(report.baby_size, "Banana (16.4 cm)");
        assert_eq!(report.reported_symptoms.as_deref(), Some("mild nausea"));
    }

    #[test]
    fn test_report_validation() {
        let today = date(2024, 6, 1);
        let missing = PregnancyService.report_on(&PregnancyRequest::default(), today);
        assert!(matches!(missing, Err(ServiceError::Validation(msg)) if msg.starts_with("Please provide either")));

        let too_late = PregnancyRequest { week: Some(43), ..Default::default() };
        assert!(PregnancyService.report_on(&too_late, today).is_err());
    }
}
