use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::component::error::RegistryError;
use crate::component::{Category, Component};
use crate::context::AppContext;
use crate::kernel::bootstrap::Application;
use crate::kernel::constants::DEFAULT_SHUTDOWN_TIMEOUT;
use crate::kernel::error::{Error, LifecycleError, Result};
use crate::kernel::state::LifecycleState;
use crate::planner::error::PlanError;

#[derive(Debug)]
struct Noop {
    name: &'static str,
}

impl Noop {
    fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self { name })
    }
}

#[async_trait]
impl Component for Noop {
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
}

#[test]
fn test_new_application_defaults() {
    let app = Application::new("demo", "0.1.0");
    assert_eq!(app.name(), "demo");
    assert_eq!(app.version(), "0.1.0");
    assert_eq!(app.app_state(), LifecycleState::Created);
    assert_eq!(app.shutdown_timeout(), DEFAULT_SHUTDOWN_TIMEOUT);
}

#[test]
fn test_with_shutdown_timeout_overrides_default() {
    let mut app = Application::new("demo", "0.1.0");
    app.with_shutdown_timeout(Duration::from_secs(5));
    assert_eq!(app.shutdown_timeout(), Duration::from_secs(5));
}

#[test]
fn test_duplicate_component_is_rejected() {
    let mut app = Application::new("demo", "0.1.0");
    app.with_component(Noop::new("one")).expect("first add");
    let err = app
        .with_component(Noop::new("one"))
        .expect_err("duplicate must be rejected");
    assert!(matches!(
        err,
        Error::Registry(RegistryError::DuplicateName(name)) if name == "one"
    ));
}

#[test]
fn test_extra_dependencies_merge_with_declared() {
    let mut app = Application::new("demo", "0.1.0");
    app.with_component(Noop::new("base")).expect("add base");
    app.with_component_deps(Noop::new("user"), &["base", "base"])
        .expect("add user");
    let deps = app
        .context()
        .with_registry(|registry| registry.dependencies_of("user"));
    assert_eq!(deps, vec!["base".to_string()]);
}

#[tokio::test]
async fn test_registration_rejected_after_initialize() {
    let mut app = Application::new("demo", "0.1.0");
    app.with_component(Noop::new("a")).expect("add");
    app.initialize().await.expect("initialize");

    let err = app
        .with_component(Noop::new("late"))
        .expect_err("registry is frozen");
    assert!(matches!(
        err,
        Error::Registry(RegistryError::Frozen { .. })
    ));
    assert!(app.with_config_path("keel.toml").is_err());
}

#[tokio::test]
async fn test_initialize_twice_is_an_invalid_state() {
    let mut app = Application::new("demo", "0.1.0");
    app.with_component(Noop::new("a")).expect("add");
    app.initialize().await.expect("first initialize");
    let err = app.initialize().await.expect_err("second must fail");
    assert!(matches!(
        err,
        Error::Lifecycle(LifecycleError::InvalidState {
            operation: "initialize",
            state: LifecycleState::Initialized,
        })
    ));
}

#[tokio::test]
async fn test_start_requires_initialized() {
    let mut app = Application::new("demo", "0.1.0");
    app.with_component(Noop::new("a")).expect("add");
    let err = app.start().await.expect_err("start before initialize");
    assert!(matches!(
        err,
        Error::Lifecycle(LifecycleError::InvalidState {
            operation: "start",
            state: LifecycleState::Created,
        })
    ));
}

#[tokio::test]
async fn test_shutdown_before_initialize_is_an_invalid_state() {
    let mut app = Application::new("demo", "0.1.0");
    let err = app.shutdown().await.expect_err("nothing to shut down");
    assert!(matches!(
        err,
        Error::Lifecycle(LifecycleError::InvalidState {
            operation: "shutdown",
            state: LifecycleState::Created,
        })
    ));
}

#[tokio::test]
async fn test_shutdown_is_idempotent_once_stopped() {
    let mut app = Application::new("demo", "0.1.0");
    app.with_component(Noop::new("a")).expect("add");
    app.initialize().await.expect("initialize");
    app.start().await.expect("start");
    app.shutdown().await.expect("first shutdown");
    assert_eq!(app.app_state(), LifecycleState::Stopped);
    app.shutdown().await.expect("second shutdown is a no-op");
    assert_eq!(app.app_state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_plan_failure_surfaces_before_any_lifecycle_work() {
    let mut app = Application::new("demo", "0.1.0");
    app.with_component_deps(Noop::new("a"), &["missing"])
        .expect("add");
    let err = app.initialize().await.expect_err("unresolvable plan");
    assert!(matches!(
        err,
        Error::Plan(PlanError::MissingDependency { .. })
    ));
    // No component was touched, so the application never left Created.
    assert_eq!(app.app_state(), LifecycleState::Created);
}
