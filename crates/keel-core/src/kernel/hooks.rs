use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::context::AppContext;
use crate::kernel::error::{Error, LifecycleError, Result};

/// The six fixed lifecycle points at which user hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeInitialize,
    AfterInitialize,
    BeforeStart,
    AfterStart,
    BeforeShutdown,
    AfterShutdown,
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HookPoint::BeforeInitialize => "before-initialize",
            HookPoint::AfterInitialize => "after-initialize",
            HookPoint::BeforeStart => "before-start",
            HookPoint::AfterStart => "after-start",
            HookPoint::BeforeShutdown => "before-shutdown",
            HookPoint::AfterShutdown => "after-shutdown",
        };
        write!(f, "{}", s)
    }
}

/// Owned future returned by a hook invocation.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// A user hook: an async callable over the application context.
pub type Hook = Box<dyn for<'a> Fn(&'a AppContext) -> HookFuture<'a> + Send + Sync>;

/// Adapt a plain closure into a [`Hook`].
pub fn sync_hook<F>(f: F) -> Hook
where
    F: Fn(&AppContext) -> Result<()> + Send + Sync + 'static,
{
    Box::new(move |ctx| {
        let result = f(ctx);
        Box::pin(async move { result })
    })
}

/// Hooks keyed by lifecycle point; invocation order is registration order.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<HookPoint, Vec<Hook>>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.hooks.values().map(|v| v.len()).sum();
        f.debug_struct("HookRegistry")
            .field("hook_count", &total)
            .finish()
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, point: HookPoint, hook: Hook) {
        self.hooks.entry(point).or_default().push(hook);
    }

    pub fn count(&self, point: HookPoint) -> usize {
        self.hooks.get(&point).map(|v| v.len()).unwrap_or(0)
    }

    /// Run the hooks for a fatal edge (the init/start points). The first
    /// error aborts and is returned wrapped with the point and index.
    pub async fn run_fatal(&self, point: HookPoint, ctx: &AppContext) -> Result<()> {
        if let Some(hooks) = self.hooks.get(&point) {
            for (index, hook) in hooks.iter().enumerate() {
                if let Err(e) = hook(ctx).await {
                    return Err(Error::Lifecycle(LifecycleError::Hook {
                        point,
                        index,
                        source: Box::new(e),
                    }));
                }
            }
        }
        Ok(())
    }

    /// Run the hooks for a shutdown edge. Errors are logged and never
    /// propagated; shutdown must continue.
    pub async fn run_logged(&self, point: HookPoint, ctx: &AppContext) {
        if let Some(hooks) = self.hooks.get(&point) {
            for (index, hook) in hooks.iter().enumerate() {
                if let Err(e) = hook(ctx).await {
                    log::error!("{} hook #{} failed: {}", point, index, e);
                }
            }
        }
    }
}
