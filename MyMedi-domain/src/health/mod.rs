//! Health report for `/health`
//! Reports database, API and outbound provider status

use std::collections::HashMap;

use async_trait::async_trait;
use my_medi_data::database;
use tracing::debug;

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    Healthy,
    /// Serving, with reduced guarantees
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    Healthy,
    /// Component is functioning but with reduced capability
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

impl HealthComponent {
    pub fn healthy() -> Self {
        Self { status: ComponentStatus::Healthy, details: None }
    }
}

/// Overall status plus one entry per component
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    pub components: HashMap<String, HealthComponent>,
}

#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    async fn get_system_health(&self) -> SystemHealth;

    /// `Ok(false)` for a degraded database, `Err` when it is unreachable
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Probe the global pool.
///
/// `Ok(false)` means the server fell back to an in-memory database, so
/// feedback and reviews will not survive a restart.
pub async fn check_database_status() -> Result<bool, String> {
    match database::pool_status() {
        Ok(status) => {
            debug!(connections = status.connections, idle = status.idle_connections, "Database pool status");
            Ok(!status.in_memory)
        }
        Err(e) => Err(format!("Database connection error: {}", e)),
    }
}

/// Status of an optional outbound provider
fn provider_component(configured: bool, key_var: &str) -> HealthComponent {
    if configured {
        HealthComponent::healthy()
    } else {
        HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(format!("{} not configured", key_var)),
        }
    }
}

fn database_component(status: Result<bool, String>) -> HealthComponent {
    match status {
        Ok(true) => HealthComponent::healthy(),
        Ok(false) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("Running on an in-memory database, data will not persist".to_string()),
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(e),
        },
    }
}

/// Health service backed by the global database pool
#[derive(Debug, Clone, Default)]
pub struct HealthService {
    ai_enabled: bool,
    maps_enabled: bool,
}

impl HealthService {
    pub fn new(ai_enabled: bool, maps_enabled: bool) -> Self {
        Self { ai_enabled, maps_enabled }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.ai_enabled(), config.maps_enabled())
    }

    /// Assemble the report from a database check result.
    ///
    /// Only the database decides the overall status. A missing AI or maps key
    /// shows up as a degraded component while the endpoints keep serving
    /// stub data.
    pub fn assemble(&self, db_status: Result<bool, String>) -> SystemHealth {
        let database = database_component(db_status);
        let status = match database.status {
            ComponentStatus::Healthy => SystemStatus::Healthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
        };

        let components = [
            ("database", database),
            ("api", HealthComponent::healthy()),
            ("ai", provider_component(self.ai_enabled, "OPENAI_API_KEY")),
            ("maps", provider_component(self.maps_enabled, "GOOGLE_MAPS_API_KEY")),
        ]
        .into_iter()
        .map(|(name, component)| (name.to_string(), component))
        .collect();

        SystemHealth { status, components }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let health = self.assemble(self.check_database_status().await);
        debug!(status = ?health.status, "System health computed");
        health
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        check_database_status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_system_health_lists_components() {
        let health = HealthService::default().get_system_health().await;
        for name in ["database", "api", "ai", "maps"] {
            assert!(health.components.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_missing_keys_do_not_degrade_overall_status() {
        let health = HealthService::new(false, false).assemble(Ok(true));
        assert_eq!(health.status, SystemStatus::Healthy);
        assert_eq!(health.components["ai"].status, ComponentStatus::Degraded);
        assert_eq!(
            health.components["maps"].details.as_deref(),
            Some("GOOGLE_MAPS_API_KEY not configured")
        );
    }

    #[test]
    fn test_database_failure_is_unhealthy() {
        let health = HealthService::new(true, true).assemble(Err("Database pool is not initialized".to_string()));
        assert_eq!(health.status, SystemStatus::Unhealthy);
        assert_eq!(health.components["database"].status, ComponentStatus::Unhealthy);
        assert_eq!(health.components["ai"].status, ComponentStatus::Healthy);
    }

    #[test]
    fn test_in_memory_fallback_is_degraded() {
        let health = HealthService::new(true, false).assemble(Ok(false));
        assert_eq!(health.status, SystemStatus::Degraded);
        assert!(health.components["database"].details.as_deref().unwrap().contains("in-memory"));
    }
}
