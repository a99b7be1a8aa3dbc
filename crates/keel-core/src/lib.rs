//! # Keel Core
//!
//! The application lifecycle kernel: a component registry, a dependency-aware
//! topological planner, and an ordered initialization/startup/shutdown engine
//! that ties typed pluggable components into a running process.
//!
//! Applications embed the kernel by constructing an [`Application`], declaring
//! components (and their dependencies) before run, and then driving the
//! lifecycle with [`Application::run`] or the finer-grained
//! `initialize`/`start`/`shutdown` operations.

pub mod component;
pub mod components;
pub mod config;
pub mod context;
pub mod health;
pub mod kernel;
pub mod planner;

// Re-export the types an embedding application touches most often.
pub use component::{Category, Component, ComponentLogger, ConfigAware, LoggerAware};
pub use config::ConfigData;
pub use context::{AppContext, StateChangeEvent, StateChangeListener};
pub use health::{HealthReport, HealthStatus};
pub use kernel::bootstrap::Application;
pub use kernel::error::{Error, Result};
pub use kernel::hooks::{Hook, HookPoint};
pub use kernel::signal::ShutdownHandle;
pub use kernel::state::LifecycleState;
pub use planner::ExecutionPlan;

// Crate-internal integration tests.
#[cfg(test)]
mod tests;
