use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PregnancyRequest {
    /// Current week, takes priority over the period date
    pub week: Option<u32>,
    pub last_period_date: Option<NaiveDate>,
    pub symptoms: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct TrimesterProgress {
    pub current: u8,
    /// Percent through the current trimester
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PregnancyReport {
    pub current_week: u32,
    pub due_date: NaiveDate,
    pub baby_size: String,
    pub trimester: TrimesterProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_symptoms: Option<String>,
    pub key_developments: Vec<String>,
    pub symptoms: Vec<String>,
    pub recommendations: Vec<String>,
    pub appointments: Vec<String>,
    pub nutrition: Vec<String>,
    pub exercises: Vec<String>,
    pub warnings: Vec<String>,
}
