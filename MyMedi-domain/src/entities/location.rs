use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Body of `POST /api/location`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct LocationRequest {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// Reverse geocoded address of the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub coordinates: Coordinates,
}

impl LocationInfo {
    /// Blank address at the given coordinates
    pub fn at(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct FacilityHours {
    pub open_now: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct FacilityGeometry {
    pub location: Coordinates,
}

/// Hospital, clinic or lab near the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct HealthcareFacility {
    pub place_id: String,
    pub name: String,
    pub vicinity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<FacilityHours>,
    pub types: Vec<String>,
    pub geometry: FacilityGeometry,
    /// Kilometres from the user
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LocationLookup {
    pub location_info: LocationInfo,
    pub facilities: Vec<HealthcareFacility>,
    pub recommendations: Vec<String>,
    /// Places API status, `API_KEY_MISSING` or `REQUEST_FAILED`
    pub google_status: String,
}

/// Outcome of probing one maps API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct ApiProbe {
    pub enabled: bool,
    pub error: Option<String>,
}

impl ApiProbe {
    pub fn ok() -> Self {
        Self { enabled: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            enabled: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProbeResults {
    /// Masked key, first eight and last four characters
    pub api_key: String,
    pub geocoding: ApiProbe,
    pub places: ApiProbe,
    pub billing: ApiProbe,
}

/// Next thing to do in the maps setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct SetupStep {
    pub step: u8,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(utoipa::ToSchema))]
pub struct MapsValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ProbeResults>,
    pub setup: Option<SetupStep>,
}
