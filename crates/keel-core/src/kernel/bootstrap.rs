use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::component::{Component, ComponentLogger};
use crate::config::{AppSettings, ConfigData};
use crate::context::{AppContext, StateChangeListener};
use crate::health::{self, HealthReport};
use crate::kernel::constants::DEFAULT_SHUTDOWN_TIMEOUT;
use crate::kernel::error::{Error, LifecycleError, Result};
use crate::kernel::hooks::{Hook, HookPoint, HookRegistry};
use crate::kernel::signal::{self, ShutdownHandle};
use crate::kernel::state::LifecycleState;
use crate::component::error::RegistryError;
use crate::planner::{build_plan, ExecutionPlan};

/// The lifecycle engine: registers components, resolves an execution plan,
/// and drives ordered initialization, startup, and supervised shutdown.
///
/// Registration (components, hooks, listeners) is permitted only before the
/// lifecycle begins; the registry freezes when `initialize` is first called.
/// Init and start run sequentially in plan order, trading throughput for
/// deterministic ordering and simple failure semantics.
#[derive(Debug)]
pub struct Application {
    name: String,
    version: String,
    context: AppContext,
    hooks: HookRegistry,
    config_path: Option<PathBuf>,
    shutdown_timeout: Duration,
    plan: Option<ExecutionPlan>,
    shutdown_handle: ShutdownHandle,
}

impl Application {
    /// Create a new application with the given identity. No I/O happens here.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            context: AppContext::new(),
            hooks: HookRegistry::new(),
            config_path: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            plan: None,
            shutdown_handle: ShutdownHandle::new(),
        }
    }

    /// Configuration file to load when the application initializes.
    pub fn with_config_path(&mut self, path: impl Into<PathBuf>) -> Result<&mut Self> {
        if self.context.is_frozen() {
            return Err(RegistryError::Frozen {
                operation: "set config path",
            }
            .into());
        }
        self.config_path = Some(path.into());
        Ok(self)
    }

    /// Register a component. Pre-run only.
    pub fn with_component(&mut self, component: Arc<dyn Component>) -> Result<&mut Self> {
        self.with_component_deps(component, &[])
    }

    /// Register a component with additional dependencies beyond the ones it
    /// declares itself. Pre-run only.
    pub fn with_component_deps(
        &mut self,
        component: Arc<dyn Component>,
        extra_deps: &[&str],
    ) -> Result<&mut Self> {
        let mut deps = component.dependencies();
        for dep in extra_deps {
            if !deps.iter().any(|d| d == dep) {
                deps.push((*dep).to_string());
            }
        }
        self.context.register(component, deps)?;
        Ok(self)
    }

    /// Register a hook at one of the six lifecycle points. Pre-run only.
    pub fn with_hook(&mut self, point: HookPoint, hook: Hook) -> Result<&mut Self> {
        if self.context.is_frozen() {
            return Err(RegistryError::Frozen {
                operation: "register hook",
            }
            .into());
        }
        self.hooks.register(point, hook);
        Ok(self)
    }

    /// Override the default 30s shutdown budget. A present
    /// `app.shutdown_timeout` config key overrides this again at initialize.
    pub fn with_shutdown_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Subscribe a state-change listener. Pre-run only.
    pub fn with_state_listener(
        &mut self,
        listener: Box<dyn StateChangeListener>,
    ) -> Result<&mut Self> {
        self.context.subscribe(listener)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The read surface handed to components and external callers.
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// A cloneable trigger for requesting graceful shutdown externally.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown_handle.clone()
    }

    pub fn app_state(&self) -> LifecycleState {
        self.context.app_state()
    }

    pub fn component_state(&self, name: &str) -> Option<LifecycleState> {
        self.context.component_state(name)
    }

    pub fn get_component(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.context.get_component(name)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Aggregated health derived from component checks and tracked state.
    pub async fn health_report(&self) -> HealthReport {
        health::collect(&self.context).await
    }

    /// Resolve the plan, load configuration, and initialize every component
    /// in dependency order. Leaves the application Initialized.
    pub async fn initialize(&mut self) -> Result<()> {
        let state = self.context.app_state();
        if state != LifecycleState::Created {
            return Err(LifecycleError::InvalidState {
                operation: "initialize",
                state,
            }
            .into());
        }
        log::info!("initializing {} v{}", self.name, self.version);
        self.context.freeze();

        let plan = self.context.with_registry(build_plan)?;
        log::debug!("execution plan: {:?}", plan.init_order());

        if let Some(path) = self.config_path.clone() {
            let data = ConfigData::load(&path)?;
            let settings = AppSettings::from_config(&data)?;
            if let Some(timeout) = settings.shutdown_timeout {
                log::debug!("shutdown timeout set from config: {:?}", timeout);
                self.shutdown_timeout = timeout;
            }
            self.context.set_config(Arc::new(data));
        }

        let order = plan.init_order().to_vec();
        self.plan = Some(plan);

        self.context.set_app_state(LifecycleState::Initializing);
        if let Err(e) = self
            .hooks
            .run_fatal(HookPoint::BeforeInitialize, &self.context)
            .await
        {
            self.context.set_app_state(LifecycleState::Failed);
            return Err(e);
        }

        self.init_components(&order).await?;

        if let Err(e) = self
            .hooks
            .run_fatal(HookPoint::AfterInitialize, &self.context)
            .await
        {
            self.context.set_app_state(LifecycleState::Failed);
            self.compensate().await;
            return Err(e);
        }

        self.context.set_app_state(LifecycleState::Initialized);
        log::info!("component initialization complete");
        Ok(())
    }

    /// Start every component in plan order. Leaves the application Running.
    pub async fn start(&mut self) -> Result<()> {
        let state = self.context.app_state();
        if state != LifecycleState::Initialized {
            return Err(LifecycleError::InvalidState {
                operation: "start",
                state,
            }
            .into());
        }
        log::info!("starting components...");
        let order = match &self.plan {
            Some(plan) => plan.init_order().to_vec(),
            None => Vec::new(),
        };

        self.context.set_app_state(LifecycleState::Starting);
        if let Err(e) = self
            .hooks
            .run_fatal(HookPoint::BeforeStart, &self.context)
            .await
        {
            self.context.set_app_state(LifecycleState::Failed);
            self.compensate().await;
            return Err(e);
        }

        self.start_components(&order).await?;

        if let Err(e) = self
            .hooks
            .run_fatal(HookPoint::AfterStart, &self.context)
            .await
        {
            self.context.set_app_state(LifecycleState::Failed);
            self.compensate().await;
            return Err(e);
        }

        self.context.set_app_state(LifecycleState::Running);
        log::info!("component start complete");
        Ok(())
    }

    /// Full lifecycle: initialize, start, block until a stop signal or an
    /// external shutdown request, then shut down gracefully.
    pub async fn run(&mut self) -> Result<()> {
        self.initialize().await?;
        self.start().await?;
        log::info!(
            "{} v{} running; waiting for shutdown trigger",
            self.name,
            self.version
        );
        signal::wait_for_shutdown(&self.shutdown_handle).await;
        self.shutdown().await
    }

    /// Graceful shutdown with the configured budget.
    pub async fn shutdown(&mut self) -> Result<()> {
        let timeout = self.shutdown_timeout;
        self.shutdown_with_timeout(timeout).await
    }

    /// Graceful shutdown with an explicit budget shared by all `stop` calls.
    pub async fn shutdown_with_timeout(&mut self, timeout: Duration) -> Result<()> {
        match self.context.app_state() {
            LifecycleState::Stopped => return Ok(()),
            LifecycleState::Created => {
                return Err(LifecycleError::InvalidState {
                    operation: "shutdown",
                    state: LifecycleState::Created,
                }
                .into())
            }
            _ => {}
        }
        match self.perform_shutdown(timeout).await {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn init_components(&mut self, order: &[String]) -> Result<()> {
        for name in order {
            if self.shutdown_handle.is_requested() {
                log::warn!("shutdown requested during initialization; cancelling");
                self.context.set_app_state(LifecycleState::Failed);
                self.compensate().await;
                return Err(LifecycleError::Cancelled {
                    phase: "initialize",
                }
                .into());
            }
            let Some(component) = self.context.get_component(name) else {
                return Err(RegistryError::Unknown(name.clone()).into());
            };
            log::info!("initializing component '{}'", name);
            self.context
                .set_component_state(name, LifecycleState::Initializing);
            self.inject_capabilities(&component);
            match component.initialize(&self.context).await {
                Ok(()) => self.context.mark_initialized(name),
                Err(e) => {
                    log::error!("component '{}' failed to initialize: {}", name, e);
                    self.context.set_component_error(name, &e);
                    self.context
                        .set_component_state(name, LifecycleState::Failed);
                    self.context.set_app_state(LifecycleState::Failed);
                    self.compensate().await;
                    return Err(LifecycleError::Initialize {
                        component: name.clone(),
                        source: Box::new(e),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    async fn start_components(&mut self, order: &[String]) -> Result<()> {
        for name in order {
            if self.shutdown_handle.is_requested() {
                log::warn!("shutdown requested during start; cancelling");
                self.context.set_app_state(LifecycleState::Failed);
                self.compensate().await;
                return Err(LifecycleError::Cancelled { phase: "start" }.into());
            }
            let Some(component) = self.context.get_component(name) else {
                return Err(RegistryError::Unknown(name.clone()).into());
            };
            log::info!("starting component '{}'", name);
            self.context
                .set_component_state(name, LifecycleState::Starting);
            match component.start(&self.context).await {
                Ok(()) => self.context.mark_started(name),
                Err(e) => {
                    log::error!("component '{}' failed to start: {}", name, e);
                    self.context.set_component_error(name, &e);
                    self.context
                        .set_component_state(name, LifecycleState::Failed);
                    self.context.set_app_state(LifecycleState::Failed);
                    self.compensate().await;
                    return Err(LifecycleError::Start {
                        component: name.clone(),
                        source: Box::new(e),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Stop already-initialized or already-started components after a
    /// mid-sequence failure. Errors are logged; the original failure is the
    /// one surfaced to the caller.
    async fn compensate(&mut self) {
        log::warn!("performing compensating shutdown after failure");
        if let Some(e) = self.perform_shutdown(self.shutdown_timeout).await {
            log::error!("compensating shutdown reported: {}", e);
        }
    }

    /// The shutdown procedure proper, shared by graceful shutdown and
    /// compensating rollback. Stops every record marked started or
    /// initialized, in shutdown order, under one shared deadline. Errors are
    /// accumulated; the last one is returned.
    async fn perform_shutdown(&mut self, timeout: Duration) -> Option<Error> {
        log::info!("shutting down components...");
        self.context.set_app_state(LifecycleState::Stopping);
        self.hooks
            .run_logged(HookPoint::BeforeShutdown, &self.context)
            .await;

        let order = match &self.plan {
            Some(plan) => plan.shutdown_order(),
            None => Vec::new(),
        };
        let deadline = Instant::now() + timeout;
        let mut last_error: Option<Error> = None;

        for name in &order {
            let eligible = self.context.with_registry(|registry| {
                registry
                    .record(name)
                    .map(|r| r.is_started() || r.is_initialized())
                    .unwrap_or(false)
            });
            if !eligible {
                continue;
            }
            let Some(component) = self.context.get_component(name) else {
                continue;
            };
            log::info!("stopping component '{}'", name);
            self.context
                .set_component_state(name, LifecycleState::Stopping);
            let remaining = deadline.saturating_duration_since(Instant::now());
            match tokio::time::timeout(remaining, component.stop(&self.context)).await {
                Ok(Ok(())) => self.context.mark_stopped(name),
                Ok(Err(e)) => {
                    log::error!("component '{}' failed to stop: {}", name, e);
                    self.context.set_component_error(name, &e);
                    self.context
                        .set_component_state(name, LifecycleState::Failed);
                    last_error = Some(
                        LifecycleError::Stop {
                            component: name.clone(),
                            source: Box::new(e),
                        }
                        .into(),
                    );
                }
                Err(_) => {
                    let err: Error = LifecycleError::StopTimeout {
                        component: name.clone(),
                        budget: timeout,
                    }
                    .into();
                    log::error!("{}", err);
                    self.context.set_component_error(name, &err);
                    self.context
                        .set_component_state(name, LifecycleState::Failed);
                    last_error = Some(err);
                }
            }
        }

        self.hooks
            .run_logged(HookPoint::AfterShutdown, &self.context)
            .await;
        self.context.set_app_state(LifecycleState::Stopped);
        if last_error.is_none() {
            log::info!("component shutdown complete");
        }
        last_error
    }

    /// Inject optional capabilities (logger, config) before `initialize`.
    fn inject_capabilities(&self, component: &Arc<dyn Component>) {
        if let Some(aware) = component.as_logger_aware() {
            aware.apply_logger(ComponentLogger::new(component.name()));
        }
        if let Some(aware) = component.as_config_aware() {
            if let Some(config) = self.context.config() {
                aware.apply_config(config);
            }
        }
    }
}
