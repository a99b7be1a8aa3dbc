use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use keel_core::component::{Category, Component};
use keel_core::{AppContext, Result};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

pub const HEARTBEAT_COMPONENT_NAME: &str = "heartbeat";

/// Demo core component: logs a periodic heartbeat from a background task it
/// owns, and tears that task down on stop.
#[derive(Debug)]
pub struct HeartbeatComponent {
    interval: Duration,
    stop: Arc<Notify>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl HeartbeatComponent {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            stop: Arc::new(Notify::new()),
            task: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Component for HeartbeatComponent {
    fn name(&self) -> &str {
        HEARTBEAT_COMPONENT_NAME
    }

    fn category(&self) -> Category {
        Category::Core
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["config".to_string(), "logging".to_string()]
    }

    async fn initialize(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    async fn start(&self, _ctx: &AppContext) -> Result<()> {
        let interval = self.interval;
        let stop = self.stop.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.notified() => break,
                    _ = tokio::time::sleep(interval) => {
                        log::info!(target: "keel::component::heartbeat", "heartbeat");
                    }
                }
            }
        });
        *self.task.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
        Ok(())
    }

    async fn stop(&self, _ctx: &AppContext) -> Result<()> {
        self.stop.notify_one();
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(task) = task {
            if task.await.is_err() {
                log::warn!("heartbeat task ended abnormally");
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
