//! # Health Surface
//!
//! Aggregated health reporting derived from component-reported health and the
//! tracked application state. Each component check is bounded by
//! [`HEALTH_CHECK_TIMEOUT`](crate::kernel::constants::HEALTH_CHECK_TIMEOUT);
//! a component that cannot answer in time is reported unhealthy rather than
//! stalling the report.

use std::time::SystemTime;

use serde::Serialize;

use crate::context::AppContext;
use crate::kernel::constants::HEALTH_CHECK_TIMEOUT;
use crate::kernel::state::LifecycleState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

/// Health of one component at the time of the report.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub checked_at: SystemTime,
}

/// Aggregated application health.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub app_state: LifecycleState,
    pub components: Vec<ComponentHealth>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Walk all components, collect their health, and aggregate.
///
/// Aggregate status: Healthy iff every component is healthy and the
/// application is Running; Unhealthy if any component is unhealthy or the
/// application is Failed; Unknown otherwise.
pub async fn collect(ctx: &AppContext) -> HealthReport {
    let app_state = ctx.app_state();
    let mut components = Vec::new();

    for name in ctx.component_names() {
        let Some(component) = ctx.get_component(&name) else {
            continue;
        };
        let (status, message) =
            match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, component.health_check()).await {
                Ok(Ok(())) => (HealthStatus::Healthy, None),
                Ok(Err(e)) => (HealthStatus::Unhealthy, Some(e.to_string())),
                Err(_) => (
                    HealthStatus::Unhealthy,
                    Some(format!(
                        "health check did not answer within {:?}",
                        HEALTH_CHECK_TIMEOUT
                    )),
                ),
            };
        components.push(ComponentHealth {
            name,
            status,
            message,
            checked_at: SystemTime::now(),
        });
    }

    let any_unhealthy = components
        .iter()
        .any(|c| c.status == HealthStatus::Unhealthy);
    let all_healthy = components.iter().all(|c| c.status == HealthStatus::Healthy);

    let status = if any_unhealthy || app_state == LifecycleState::Failed {
        HealthStatus::Unhealthy
    } else if all_healthy && app_state == LifecycleState::Running {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unknown
    };

    HealthReport {
        status,
        app_state,
        components,
    }
}

#[cfg(test)]
mod tests;
