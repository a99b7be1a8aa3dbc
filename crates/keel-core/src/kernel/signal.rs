use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// External shutdown trigger, cloneable into any task.
///
/// Triggering during init/start is observed between component steps and
/// treated as a cancellation; triggering while the application blocks in
/// `run` starts graceful shutdown immediately.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request graceful shutdown. Idempotent.
    pub fn request(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            self.notify.notify_one();
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown has been requested, immediately if it already
    /// was. `notify_one` stores a permit, so a request that races the await
    /// is never lost.
    pub async fn triggered(&self) {
        if self.is_requested() {
            return;
        }
        self.notify.notified().await;
    }
}

/// Block until a stop signal arrives or the handle is triggered.
///
/// Handles the two conventional "stop the process" signals. The first one
/// returns control to the caller (which begins shutdown); a second signal
/// during shutdown is recorded but does not escalate, leaving hard-kill to
/// the process supervisor.
pub async fn wait_for_shutdown(handle: &ShutdownHandle) {
    let from_signal = wait_inner(handle).await;
    if from_signal {
        tokio::spawn(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("second interrupt received; shutdown already in progress");
            }
        });
    }
}

#[cfg(unix)]
async fn wait_inner(handle: &ShutdownHandle) -> bool {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(stream) => Some(stream),
        Err(e) => {
            log::error!("cannot install SIGTERM handler: {}", e);
            None
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                log::error!("interrupt handler failed: {}", e);
            }
            log::info!("received interrupt signal");
            true
        }
        _ = async {
            match sigterm.as_mut() {
                Some(stream) => { stream.recv().await; }
                None => std::future::pending::<()>().await,
            }
        } => {
            log::info!("received termination signal");
            true
        }
        _ = handle.triggered() => {
            log::debug!("shutdown requested");
            false
        }
    }
}

#[cfg(not(unix))]
async fn wait_inner(handle: &ShutdownHandle) -> bool {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                log::error!("interrupt handler failed: {}", e);
            }
            log::info!("received interrupt signal");
            true
        }
        _ = handle.triggered() => {
            log::debug!("shutdown requested");
            false
        }
    }
}
