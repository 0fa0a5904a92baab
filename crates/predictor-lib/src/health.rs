//! Health tracking for the prediction service
//!
//! Components report their status into a shared registry; the API layer
//! folds them into the /health response.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is experiencing issues but still operational
    Degraded,
    /// Component has failed
    Unhealthy,
}

/// Component names for health tracking
pub mod components {
    pub const MODEL: &str = "model";
    pub const DATASET: &str = "dataset";
}

/// Snapshot of a component's health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self::with_status(ComponentStatus::Healthy, None)
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Degraded, Some(message.into()))
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Unhealthy, Some(message.into()))
    }

    fn with_status(status: ComponentStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Aggregated health across all registered components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub status: ComponentStatus,
    pub components: HashMap<String, ComponentHealth>,
}

impl HealthSnapshot {
    /// Worst component status wins; degraded beats healthy
    fn compute_status(components: &HashMap<String, ComponentHealth>) -> ComponentStatus {
        let mut has_degraded = false;
        for health in components.values() {
            match health.status {
                ComponentStatus::Unhealthy => return ComponentStatus::Unhealthy,
                ComponentStatus::Degraded => has_degraded = true,
                ComponentStatus::Healthy => {}
            }
        }
        if has_degraded {
            ComponentStatus::Degraded
        } else {
            ComponentStatus::Healthy
        }
    }
}

/// Shared registry of component health
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<HashMap<String, ComponentHealth>>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with initial healthy status
    pub async fn register(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    pub async fn update(&self, name: &str, health: ComponentHealth) {
        let mut components = self.components.write().await;
        components.insert(name.to_string(), health);
    }

    pub async fn set_healthy(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    pub async fn set_degraded(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::degraded(message)).await;
    }

    pub async fn set_unhealthy(&self, name: &str, message: impl Into<String>) {
        self.update(name, ComponentHealth::unhealthy(message)).await;
    }

    pub async fn snapshot(&self) -> HealthSnapshot {
        let components = self.components.read().await.clone();
        let status = HealthSnapshot::compute_status(&components);
        HealthSnapshot { status, components }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_registry_is_healthy() {
        let registry = HealthRegistry::new();
        let snapshot = registry.snapshot().await;

        assert_eq!(snapshot.status, ComponentStatus::Healthy);
        assert!(snapshot.components.is_empty());
    }

    #[tokio::test]
    async fn test_registered_component_starts_healthy() {
        let registry = HealthRegistry::new();
        registry.register(components::MODEL).await;

        let snapshot = registry.snapshot().await;
        assert_eq!(
            snapshot.components[components::MODEL].status,
            ComponentStatus::Healthy
        );
    }

    #[tokio::test]
    async fn test_degraded_component_degrades_overall_status() {
        let registry = HealthRegistry::new();
        registry.register(components::MODEL).await;
        registry.register(components::DATASET).await;
        registry
            .set_degraded(components::DATASET, "dataset file missing, regenerating")
            .await;

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.status, ComponentStatus::Degraded);
    }

    #[tokio::test]
    async fn test_unhealthy_component_wins_over_degraded() {
        let registry = HealthRegistry::new();
        registry.register(components::MODEL).await;
        registry.register(components::DATASET).await;
        registry.set_degraded(components::DATASET, "slow").await;
        registry
            .set_unhealthy(components::MODEL, "training failed")
            .await;

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.status, ComponentStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_recovery_restores_healthy_status() {
        let registry = HealthRegistry::new();
        registry.register(components::MODEL).await;
        registry.set_unhealthy(components::MODEL, "boom").await;
        registry.set_healthy(components::MODEL).await;

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.status, ComponentStatus::Healthy);
        assert!(snapshot.components[components::MODEL].message.is_none());
    }
}
