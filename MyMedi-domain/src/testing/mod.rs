//! Test doubles for crates that build on the domain layer.
//! Compiled only with the `mock` feature.

use async_trait::async_trait;

use crate::health::{ComponentStatus, HealthComponent, HealthService, HealthServiceTrait, SystemHealth};

/// Health service with a scripted database result.
///
/// The report is assembled by the real `HealthService`, so overall status
/// follows the same rules as production.
#[derive(Debug, Clone)]
pub struct MockHealthService {
    database: Result<bool, String>,
    service: HealthService,
    extra: Vec<(String, HealthComponent)>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Healthy database with both provider keys configured
    pub fn new() -> Self {
        Self {
            database: Ok(true),
            service: HealthService::new(true, true),
            extra: Vec::new(),
        }
    }

    /// Database answering from the in-memory fallback
    pub fn with_in_memory_database(mut self) -> Self {
        self.database = Ok(false);
        self
    }

    pub fn with_database_error(mut self, message: &str) -> Self {
        self.database = Err(message.to_string());
        self
    }

    /// Report the AI and maps providers as configured or not
    pub fn with_providers(mut self, ai_enabled: bool, maps_enabled: bool) -> Self {
        self.service = HealthService::new(ai_enabled, maps_enabled);
        self
    }

    /// Extra component, reported alongside the standard ones
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<&str>) -> Self {
        self.extra.push((
            name.to_string(),
            HealthComponent { status, details: details.map(str::to_string) },
        ));
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut health = self.service.assemble(self.database.clone());
        health.components.extend(self.extra.iter().cloned());
        health
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        self.database.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::SystemStatus;

    #[tokio::test]
    async fn test_mock_follows_database_result() {
        let healthy = MockHealthService::new().get_system_health().await;
        assert_eq!(healthy.status, SystemStatus::Healthy);

        let degraded = MockHealthService::new().with_in_memory_database().get_system_health().await;
        assert_eq!(degraded.status, SystemStatus::Degraded);

        let failed = MockHealthService::new().with_database_error("boom");
        assert_eq!(failed.check_database_status().await, Err("boom".to_string()));
        assert_eq!(failed.get_system_health().await.status, SystemStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_extra_components_are_reported() {
        let health = MockHealthService::new()
            .with_component("cache", ComponentStatus::Unhealthy, Some("evicted"))
            .get_system_health()
            .await;
        assert_eq!(health.components["cache"].details.as_deref(), Some("evicted"));
        assert_eq!(health.status, SystemStatus::Healthy);
    }
}
