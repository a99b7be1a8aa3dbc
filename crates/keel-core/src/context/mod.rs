//! # Application Context
//!
//! The read surface exposed to components and external callers: component
//! lookup by name or category, current application and per-component state,
//! the loaded configuration handle, and state-change subscription.
//!
//! The context exposes no mutation. All transitions are performed by the
//! lifecycle engine through crate-internal methods; every transition is
//! broadcast synchronously to subscribed listeners in registration order.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::component::error::RegistryError;
use crate::component::{Category, Component, ComponentRegistry};
use crate::config::ConfigData;
use crate::kernel::constants::APP_ENTITY;
use crate::kernel::error::{Error, Result};
use crate::kernel::state::LifecycleState;

/// One state transition of the application (`entity == "app"`) or of a single
/// component (`entity` is the component name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChangeEvent {
    pub entity: String,
    pub previous: LifecycleState,
    pub next: LifecycleState,
}

impl StateChangeEvent {
    pub fn is_app(&self) -> bool {
        self.entity == APP_ENTITY
    }
}

/// Subscriber notified synchronously of every state transition.
///
/// Delivery happens on the engine's thread of control: listeners must be
/// trivial or dispatch work to their own background tasks. A listener error
/// is logged and does not prevent later listeners from running.
pub trait StateChangeListener: Send + Sync {
    fn on_state_change(&self, event: &StateChangeEvent) -> Result<()>;
}

struct ContextInner {
    registry: RwLock<ComponentRegistry>,
    app_state: RwLock<LifecycleState>,
    listeners: RwLock<Vec<Box<dyn StateChangeListener>>>,
    config: RwLock<Option<Arc<ConfigData>>>,
}

/// Cheaply cloneable handle over the shared kernel state.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<ContextInner>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("app_state", &self.app_state())
            .field("components", &self.inner_registry().len())
            .finish()
    }
}

impl AppContext {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(ContextInner {
                registry: RwLock::new(ComponentRegistry::new()),
                app_state: RwLock::new(LifecycleState::Created),
                listeners: RwLock::new(Vec::new()),
                config: RwLock::new(None),
            }),
        }
    }

    // Lock helpers. Poisoning is tolerated: a panicking component must not
    // wedge state reads during shutdown.
    fn inner_registry(&self) -> RwLockReadGuard<'_, ComponentRegistry> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn inner_registry_mut(&self) -> RwLockWriteGuard<'_, ComponentRegistry> {
        self.inner
            .registry
            .write()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a component by name.
    pub fn get_component(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.inner_registry().get(name)
    }

    /// First component of the category, by sorted name.
    pub fn get_component_by_category(&self, category: Category) -> Option<Arc<dyn Component>> {
        self.inner_registry().by_category(category).into_iter().next()
    }

    /// All components of the category, sorted by name.
    pub fn get_components_by_category(&self, category: Category) -> Vec<Arc<dyn Component>> {
        self.inner_registry().by_category(category)
    }

    /// All registered component names, sorted.
    pub fn component_names(&self) -> Vec<String> {
        let mut names = self.inner_registry().names();
        names.sort();
        names
    }

    /// Current application state.
    pub fn app_state(&self) -> LifecycleState {
        *self
            .inner
            .app_state
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Current state of a component, if registered.
    pub fn component_state(&self, name: &str) -> Option<LifecycleState> {
        self.inner_registry().record(name).map(|r| r.state())
    }

    /// The loaded configuration, if a config path was supplied.
    pub fn config(&self) -> Option<Arc<ConfigData>> {
        self.inner
            .config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Register a state-change listener. Permitted only before run.
    pub fn subscribe(&self, listener: Box<dyn StateChangeListener>) -> Result<()> {
        if self.inner_registry().is_frozen() {
            return Err(RegistryError::Frozen {
                operation: "subscribe listener",
            }
            .into());
        }
        self.inner
            .listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
        Ok(())
    }

    // ---- crate-internal mutation, used by the lifecycle engine only ----

    pub(crate) fn register(
        &self,
        component: Arc<dyn Component>,
        dependencies: Vec<String>,
    ) -> std::result::Result<(), RegistryError> {
        self.inner_registry_mut().add(component, dependencies)
    }

    pub(crate) fn freeze(&self) {
        self.inner_registry_mut().freeze();
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.inner_registry().is_frozen()
    }

    pub(crate) fn set_config(&self, config: Arc<ConfigData>) {
        *self
            .inner
            .config
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(config);
    }

    /// Run a closure against the registry under the read lock.
    pub(crate) fn with_registry<R>(&self, f: impl FnOnce(&ComponentRegistry) -> R) -> R {
        f(&self.inner_registry())
    }

    pub(crate) fn set_app_state(&self, next: LifecycleState) {
        let previous = {
            let mut state = self
                .inner
                .app_state
                .write()
                .unwrap_or_else(|e| e.into_inner());
            let previous = *state;
            *state = next;
            previous
        };
        if previous != next {
            self.emit(APP_ENTITY, previous, next);
        }
    }

    pub(crate) fn set_component_state(&self, name: &str, next: LifecycleState) {
        let previous = {
            let mut registry = self.inner_registry_mut();
            let previous = registry.record(name).map(|r| r.state());
            if let Err(e) = registry.set_state(name, next) {
                log::error!("cannot set state of component '{}': {}", name, e);
            }
            previous
        };
        if let Some(previous) = previous {
            if previous != next {
                self.emit(name, previous, next);
            }
        }
    }

    pub(crate) fn mark_initialized(&self, name: &str) {
        if let Err(e) = self.inner_registry_mut().set_initialized(name, true) {
            log::error!("cannot mark component '{}' initialized: {}", name, e);
        }
        self.set_component_state(name, LifecycleState::Initialized);
    }

    pub(crate) fn mark_started(&self, name: &str) {
        if let Err(e) = self.inner_registry_mut().set_started(name, true) {
            log::error!("cannot mark component '{}' started: {}", name, e);
        }
        self.set_component_state(name, LifecycleState::Running);
    }

    pub(crate) fn mark_stopped(&self, name: &str) {
        {
            let mut registry = self.inner_registry_mut();
            let _ = registry.set_started(name, false);
            let _ = registry.set_initialized(name, false);
        }
        self.set_component_state(name, LifecycleState::Stopped);
    }

    pub(crate) fn set_component_error(&self, name: &str, error: &Error) {
        if let Err(e) = self
            .inner_registry_mut()
            .set_last_error(name, error.to_string())
        {
            log::error!("cannot record error for component '{}': {}", name, e);
        }
    }

    /// Fan the event out to all listeners, in registration order. The state
    /// locks are released before delivery so listeners may read state.
    fn emit(&self, entity: &str, previous: LifecycleState, next: LifecycleState) {
        let event = StateChangeEvent {
            entity: entity.to_string(),
            previous,
            next,
        };
        let listeners = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner());
        for (index, listener) in listeners.iter().enumerate() {
            if let Err(e) = listener.on_state_change(&event) {
                log::warn!(
                    "state-change listener #{} failed on {} -> {} for '{}': {}",
                    index,
                    event.previous,
                    event.next,
                    event.entity,
                    e
                );
            }
        }
    }
}
