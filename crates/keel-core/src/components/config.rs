use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::component::{Category, Component, ConfigAware};
use crate::config::ConfigData;
use crate::context::AppContext;
use crate::kernel::error::Result;

pub const CONFIG_COMPONENT_NAME: &str = "config";

/// Infrastructure component holding the loaded configuration.
///
/// The kernel injects the configuration through the [`ConfigAware`]
/// capability before `initialize`; peers reach it via
/// `ctx.get_component("config")` or through the category accessors.
#[derive(Default)]
pub struct ConfigComponent {
    data: RwLock<Option<Arc<ConfigData>>>,
}

impl ConfigComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// The injected configuration, if any was loaded.
    pub fn data(&self) -> Option<Arc<ConfigData>> {
        self.data.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Typed dot-notation lookup against the held configuration.
    pub fn get_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data().and_then(|data| data.get_as(key))
    }
}

impl fmt::Debug for ConfigComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigComponent")
            .field("loaded", &self.data().is_some())
            .finish()
    }
}

impl ConfigAware for ConfigComponent {
    fn apply_config(&self, config: Arc<ConfigData>) {
        *self.data.write().unwrap_or_else(|e| e.into_inner()) = Some(config);
    }
}

#[async_trait]
impl Component for ConfigComponent {
    fn name(&self) -> &str {
        CONFIG_COMPONENT_NAME
    }

    fn category(&self) -> Category {
        Category::Infrastructure
    }

    async fn initialize(&self, _ctx: &AppContext) -> Result<()> {
        if self.data().is_none() {
            log::debug!("no configuration file loaded; config component is empty");
        }
        Ok(())
    }

    async fn start(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    async fn stop(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    fn as_config_aware(&self) -> Option<&dyn ConfigAware> {
        Some(self)
    }
}
