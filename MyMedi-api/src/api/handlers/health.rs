use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use my_medi_domain::health::{ComponentStatus as DomainComponentStatus, HealthComponent, SystemStatus};

use crate::api::state::AppState;

/// Health check response with component and runtime details
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, `degraded` or `error`
    pub status: String,
    pub version: String,
    /// Unix seconds
    pub timestamp: u64,
    /// Seconds since the router was built
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    pub components: ComponentStatus,
    /// `APP_ENV`
    pub environment: String,
}

/// Per-component report. Unknown component names go under `additional`.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// SQLite pool
    pub database: ComponentHealthStatus,
    pub api: ComponentHealthStatus,
    /// Text generation provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<ComponentHealthStatus>,
    /// Maps and places provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps: Option<ComponentHealthStatus>,
    /// Any other reported components
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub additional: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&HealthComponent> for ComponentHealthStatus {
    fn from(component: &HealthComponent) -> Self {
        Self {
            status: map_component_status(&component.status).to_string(),
            message: component.details.clone(),
        }
    }
}

/// Unix time the router was built
static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Record the server start time used for uptime reporting
pub fn initialize_server_start_time() {
    SERVER_START_TIME.get_or_init(unix_now);
}

/// Database, provider and runtime status of the server
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database healthy", body = HealthResponse),
        (status = 500, description = "Database unavailable", body = HealthResponse),
        (status = 503, description = "Running on in-memory storage", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip_all)]
pub async fn health_check(
    State(state): State<AppState>,
) -> impl IntoResponse {
    info!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = state.health.get_system_health().await;

    let overall_status = match system_health.status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: component_statuses(&system_health.components),
        environment: state.config.app_env.clone(),
    };

    match system_health.status {
        SystemStatus::Healthy => (StatusCode::OK, Json(response)),
        SystemStatus::Degraded => {
            warn!("System health is degraded");
            (StatusCode::SERVICE_UNAVAILABLE, Json(response))
        }
        SystemStatus::Unhealthy => {
            warn!("System health is unhealthy");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response))
        }
    }
}

fn component_statuses(components: &HashMap<String, HealthComponent>) -> ComponentStatus {
    let required = |name: &str| {
        components
            .get(name)
            .map(ComponentHealthStatus::from)
            .unwrap_or(ComponentHealthStatus { status: "ok".to_string(), message: None })
    };

    let additional: serde_json::Map<String, serde_json::Value> = components
        .iter()
        .filter(|(name, _)| !matches!(name.as_str(), "database" | "api" | "ai" | "maps"))
        .map(|(name, component)| {
            (
                name.clone(),
                serde_json::json!({
                    "status": map_component_status(&component.status),
                    "message": component.details,
                }),
            )
        })
        .collect();

    ComponentStatus {
        database: required("database"),
        api: required("api"),
        ai: components.get("ai").map(ComponentHealthStatus::from),
        maps: components.get("maps").map(ComponentHealthStatus::from),
        additional: (!additional.is_empty()).then(|| additional.into()),
    }
}

fn map_component_status(status: &DomainComponentStatus) -> &'static str {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(status: DomainComponentStatus, details: Option<&str>) -> HealthComponent {
        HealthComponent { status, details: details.map(str::to_string) }
    }

    #[test]
    fn test_component_statuses_split_known_and_additional() {
        let mut components = HashMap::new();
        components.insert("database".to_string(), component(DomainComponentStatus::Healthy, None));
        components.insert("api".to_string(), component(DomainComponentStatus::Healthy, None));
        components.insert(
            "ai".to_string(),
            component(DomainComponentStatus::Degraded, Some("OPENAI_API_KEY not configured")),
        );
        components.insert("cache".to_string(), component(DomainComponentStatus::Unhealthy, Some("down")));

        let statuses = component_statuses(&components);
        assert_eq!(statuses.database.status, "ok");
        let ai = statuses.ai.unwrap();
        assert_eq!(ai.status, "degraded");
        assert_eq!(ai.message.as_deref(), Some("OPENAI_API_KEY not configured"));
        assert!(statuses.maps.is_none());
        assert_eq!(statuses.additional.unwrap()["cache"]["status"], "error");
    }

    #[test]
    fn test_missing_required_components_default_to_ok() {
        let statuses = component_statuses(&HashMap::new());
        assert_eq!(statuses.database.status, "ok");
        assert_eq!(statuses.api.status, "ok");
        assert!(statuses.additional.is_none());
    }
}
