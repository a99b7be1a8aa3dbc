use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::component::{Category, Component, ConfigAware};
use crate::config::ConfigData;
use crate::context::AppContext;
use crate::kernel::error::Result;

pub const LOGGING_COMPONENT_NAME: &str = "logging";

/// Infrastructure component that installs the process-wide log sink.
///
/// Uses `env_logger` behind the `log` facade. A `log.level` key in the
/// loaded configuration sets the default filter; `RUST_LOG` still wins when
/// present. Initialization is idempotent: if a logger is already installed
/// the component leaves it alone.
#[derive(Default)]
pub struct LoggingComponent {
    filter: RwLock<Option<String>>,
}

impl LoggingComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn configured_filter(&self) -> Option<String> {
        self.filter.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl fmt::Debug for LoggingComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingComponent")
            .field("filter", &self.configured_filter())
            .finish()
    }
}

impl ConfigAware for LoggingComponent {
    fn apply_config(&self, config: Arc<ConfigData>) {
        if let Some(level) = config.get_str("log.level") {
            *self.filter.write().unwrap_or_else(|e| e.into_inner()) = Some(level.to_string());
        }
    }
}

#[async_trait]
impl Component for LoggingComponent {
    fn name(&self) -> &str {
        LOGGING_COMPONENT_NAME
    }

    fn category(&self) -> Category {
        Category::Infrastructure
    }

    async fn initialize(&self, _ctx: &AppContext) -> Result<()> {
        let default_filter = self.configured_filter().unwrap_or_else(|| "info".to_string());
        let env = env_logger::Env::default().default_filter_or(default_filter);
        // try_init fails when a logger is already installed (embedders, test
        // harnesses); that is not an error for this component.
        let _ = env_logger::Builder::from_env(env).try_init();
        Ok(())
    }

    async fn start(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    async fn stop(&self, _ctx: &AppContext) -> Result<()> {
        log::logger().flush();
        Ok(())
    }

    fn as_config_aware(&self) -> Option<&dyn ConfigAware> {
        Some(self)
    }
}
