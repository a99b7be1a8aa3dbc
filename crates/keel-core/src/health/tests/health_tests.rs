use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::component::{Category, Component};
use crate::context::AppContext;
use crate::health::{self, HealthStatus};
use crate::kernel::error::{Error, Result};
use crate::kernel::state::LifecycleState;

#[derive(Debug)]
enum Answer {
    Healthy,
    Unhealthy(&'static str),
    Stalled,
}

#[derive(Debug)]
struct Probe {
    name: &'static str,
    answer: Answer,
}

impl Probe {
    fn new(name: &'static str, answer: Answer) -> Arc<Self> {
        Arc::new(Self { name, answer })
    }
}

#[async_trait]
impl Component for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn category(&self) -> Category {
        Category::Core
    }

    async fn initialize(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    async fn start(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    async fn stop(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        match self.answer {
            Answer::Healthy => Ok(()),
            Answer::Unhealthy(message) => Err(Error::Other(message.to_string())),
            Answer::Stalled => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

fn context_with(probes: Vec<Arc<Probe>>) -> AppContext {
    let ctx = AppContext::new();
    for probe in probes {
        ctx.register(probe, Vec::new()).expect("register");
    }
    ctx
}

#[tokio::test]
async fn test_all_healthy_and_running_is_healthy() {
    let ctx = context_with(vec![
        Probe::new("a", Answer::Healthy),
        Probe::new("b", Answer::Healthy),
    ]);
    ctx.set_app_state(LifecycleState::Running);

    let report = health::collect(&ctx).await;
    assert!(report.is_healthy());
    assert_eq!(report.app_state, LifecycleState::Running);
    assert_eq!(report.components.len(), 2);
    assert!(report
        .components
        .iter()
        .all(|c| c.status == HealthStatus::Healthy && c.message.is_none()));
}

#[tokio::test]
async fn test_healthy_components_but_not_running_is_unknown() {
    let ctx = context_with(vec![Probe::new("a", Answer::Healthy)]);
    let report = health::collect(&ctx).await;
    assert_eq!(report.status, HealthStatus::Unknown);
    assert_eq!(report.app_state, LifecycleState::Created);
}

#[tokio::test]
async fn test_one_unhealthy_component_taints_the_report() {
    let ctx = context_with(vec![
        Probe::new("good", Answer::Healthy),
        Probe::new("bad", Answer::Unhealthy("pool exhausted")),
    ]);
    ctx.set_app_state(LifecycleState::Running);

    let report = health::collect(&ctx).await;
    assert_eq!(report.status, HealthStatus::Unhealthy);
    let bad = report
        .components
        .iter()
        .find(|c| c.name == "bad")
        .expect("bad component is listed");
    assert_eq!(bad.status, HealthStatus::Unhealthy);
    assert_eq!(bad.message.as_deref(), Some("pool exhausted"));
}

#[tokio::test]
async fn test_failed_application_is_unhealthy_even_with_healthy_components() {
    let ctx = context_with(vec![Probe::new("a", Answer::Healthy)]);
    ctx.set_app_state(LifecycleState::Failed);

    let report = health::collect(&ctx).await;
    assert_eq!(report.status, HealthStatus::Unhealthy);
}

#[tokio::test]
async fn test_empty_registry_running_is_healthy() {
    let ctx = context_with(Vec::new());
    ctx.set_app_state(LifecycleState::Running);
    let report = health::collect(&ctx).await;
    assert!(report.is_healthy());
    assert!(report.components.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stalled_check_is_reported_unhealthy() {
    let ctx = context_with(vec![Probe::new("stuck", Answer::Stalled)]);
    ctx.set_app_state(LifecycleState::Running);

    let report = health::collect(&ctx).await;
    assert_eq!(report.status, HealthStatus::Unhealthy);
    let stuck = &report.components[0];
    assert_eq!(stuck.status, HealthStatus::Unhealthy);
    assert!(stuck
        .message
        .as_deref()
        .is_some_and(|m| m.contains("did not answer")));
}
