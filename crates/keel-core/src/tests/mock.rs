//! Shared test doubles for lifecycle integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::component::{Category, Component};
use crate::context::AppContext;
use crate::kernel::error::{Error, Result};

/// Records lifecycle events ("init:a", "start:a", "stop:a") across all
/// components sharing the tracker, in call order.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    events: Arc<Mutex<Vec<String>>>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().expect("tracker lock").push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("tracker lock").clone()
    }

    pub fn count_of(&self, event: &str) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }
}

/// A component whose lifecycle calls are recorded and whose failure modes are
/// scripted per test.
#[derive(Debug)]
pub struct TrackedComponent {
    name: String,
    category: Category,
    deps: Vec<String>,
    tracker: Tracker,
    fail_init: bool,
    fail_start: bool,
    fail_stop: bool,
    stop_delay: Option<Duration>,
}

impl TrackedComponent {
    pub fn new(name: &str, category: Category, tracker: &Tracker) -> Self {
        Self {
            name: name.to_string(),
            category,
            deps: Vec::new(),
            tracker: tracker.clone(),
            fail_init: false,
            fail_start: false,
            fail_stop: false,
            stop_delay: None,
        }
    }

    pub fn with_deps(mut self, deps: &[&str]) -> Self {
        self.deps = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn with_stop_delay(mut self, delay: Duration) -> Self {
        self.stop_delay = Some(delay);
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl Component for TrackedComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Category {
        self.category
    }

    fn dependencies(&self) -> Vec<String> {
        self.deps.clone()
    }

    async fn initialize(&self, _ctx: &AppContext) -> Result<()> {
        self.tracker.record(format!("init:{}", self.name));
        if self.fail_init {
            return Err(Error::Other(format!("{} refuses to initialize", self.name)));
        }
        Ok(())
    }

    async fn start(&self, _ctx: &AppContext) -> Result<()> {
        self.tracker.record(format!("start:{}", self.name));
        if self.fail_start {
            return Err(Error::Other(format!("{} refuses to start", self.name)));
        }
        Ok(())
    }

    async fn stop(&self, _ctx: &AppContext) -> Result<()> {
        self.tracker.record(format!("stop:{}", self.name));
        if let Some(delay) = self.stop_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_stop {
            return Err(Error::Other(format!("{} refuses to stop", self.name)));
        }
        Ok(())
    }
}
