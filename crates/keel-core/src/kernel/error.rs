//! # Keel Core Kernel Errors
//!
//! Defines the top-level [`Error`] enum aggregating the typed error of each
//! subsystem, plus [`LifecycleError`] for failures raised by the lifecycle
//! engine itself (component init/start/stop failures, hook failures, invalid
//! state transitions, and shutdown timeouts).

use std::result::Result as StdResult;
use std::time::Duration;

use thiserror::Error as ThisError;

use crate::component::error::RegistryError;
use crate::config::error::ConfigError;
use crate::kernel::hooks::HookPoint;
use crate::kernel::state::LifecycleState;
use crate::planner::error::PlanError;

/// Top-level error type for the keel kernel.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Component registration or registry lookup failure.
    #[error("component registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Dependency resolution failure (missing dependency, cycle, or
    /// category-order conflict).
    #[error("dependency resolution error: {0}")]
    Plan(#[from] PlanError),

    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failure raised while driving the lifecycle state machine.
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Generic error with message, for component implementations that have no
    /// richer type to report.
    #[error("{0}")]
    Other(String),
}

/// Errors produced by the lifecycle engine.
#[derive(Debug, ThisError)]
pub enum LifecycleError {
    /// A component's `initialize` failed. Fatal; triggers compensation.
    #[error("component '{component}' failed to initialize: {source}")]
    Initialize {
        component: String,
        #[source]
        source: Box<Error>,
    },

    /// A component's `start` failed. Fatal; triggers compensation.
    #[error("component '{component}' failed to start: {source}")]
    Start {
        component: String,
        #[source]
        source: Box<Error>,
    },

    /// A component's `stop` failed. Accumulated during shutdown, never fatal.
    #[error("component '{component}' failed to stop: {source}")]
    Stop {
        component: String,
        #[source]
        source: Box<Error>,
    },

    /// A component's `stop` did not return within the shared shutdown budget.
    #[error("component '{component}' did not stop within the {budget:?} shutdown budget")]
    StopTimeout { component: String, budget: Duration },

    /// A hook on the fatal edge (BeforeInitialize, AfterInitialize,
    /// BeforeStart, AfterStart) returned an error.
    #[error("{point} hook #{index} failed: {source}")]
    Hook {
        point: HookPoint,
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// The requested operation is not legal in the current application state.
    #[error("operation '{operation}' is not valid in application state '{state}'")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },

    /// Shutdown was requested while init/start was still in progress; treated
    /// as a failure and followed by compensating shutdown.
    #[error("run cancelled during {phase}")]
    Cancelled { phase: &'static str },
}

/// Shorthand for Result with the kernel Error type.
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
