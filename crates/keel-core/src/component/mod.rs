//! # Component Contract
//!
//! Every managed unit exposes its identity (name, category), its declared
//! dependencies, and four lifecycle operations. Components are created by the
//! embedding application; ownership transfers to the kernel at registration.
//!
//! Optional capabilities (accepting a logger handle or a configuration handle)
//! are modeled as separate traits probed through [`Component::as_logger_aware`]
//! and [`Component::as_config_aware`]; the kernel injects them immediately
//! before `initialize` when present.

pub mod error;
pub mod registry;

use std::any::Any;
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::ConfigData;
use crate::context::AppContext;
use crate::kernel::error::Result;

pub use error::RegistryError;
pub use registry::{ComponentRecord, ComponentRegistry};

/// Coarse phase grouping used as a tiebreaker in planning. Infrastructure
/// initializes first and shuts down last; Web is the opposite end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Infrastructure,
    DataSource,
    Core,
    Web,
}

impl Category {
    /// All categories in precedence order.
    pub const ALL: [Category; 4] = [
        Category::Infrastructure,
        Category::DataSource,
        Category::Core,
        Category::Web,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Infrastructure => "infrastructure",
            Category::DataSource => "datasource",
            Category::Core => "core",
            Category::Web => "web",
        };
        write!(f, "{}", s)
    }
}

/// Core lifecycle trait for all managed components.
#[async_trait]
pub trait Component: Any + Send + Sync + Debug {
    /// Unique non-empty name, stable for the lifetime of the process.
    fn name(&self) -> &str;

    /// Phase grouping for planning.
    fn category(&self) -> Category;

    /// Names of components that must be initialized and started before this
    /// one. Order is irrelevant for correctness but preserved for diagnostics.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Acquire resources and prepare to serve.
    async fn initialize(&self, ctx: &AppContext) -> Result<()>;

    /// Transition into the serving state. Must not block indefinitely;
    /// long-running work is spawned as background tasks the component owns.
    async fn start(&self, ctx: &AppContext) -> Result<()>;

    /// Release all resources acquired during initialize and start. The engine
    /// bounds this call with the shared shutdown deadline.
    async fn stop(&self, ctx: &AppContext) -> Result<()>;

    /// Return `Ok(())` when healthy. Called on demand, never on a request
    /// path. Components that cannot answer quickly must return an error
    /// rather than stall.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    /// Probe for the config-acceptor capability.
    fn as_config_aware(&self) -> Option<&dyn ConfigAware> {
        None
    }

    /// Probe for the logger-acceptor capability.
    fn as_logger_aware(&self) -> Option<&dyn LoggerAware> {
        None
    }
}

/// Capability: the component accepts the loaded configuration handle before
/// `initialize`.
pub trait ConfigAware: Send + Sync {
    fn apply_config(&self, config: Arc<ConfigData>);
}

/// Capability: the component accepts a named logger handle before
/// `initialize`.
pub trait LoggerAware: Send + Sync {
    fn apply_logger(&self, logger: ComponentLogger);
}

/// Per-component logger handle over the `log` facade. Records carry a
/// `keel::component::<name>` target so sinks can filter by component.
#[derive(Debug, Clone)]
pub struct ComponentLogger {
    target: String,
}

impl ComponentLogger {
    pub fn new(component_name: &str) -> Self {
        Self {
            target: format!("keel::component::{}", component_name),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn log(&self, level: log::Level, message: &str) {
        log::log!(target: &self.target, level, "{}", message);
    }

    pub fn debug(&self, message: &str) {
        self.log(log::Level::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(log::Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(log::Level::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(log::Level::Error, message);
    }
}

#[cfg(test)]
mod tests;
