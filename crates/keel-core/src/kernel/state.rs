use std::fmt;

use serde::Serialize;

/// Lifecycle state shared by the application and every component record.
///
/// Transitions are driven exclusively by the lifecycle engine; the table in
/// [`LifecycleState::can_transition_to`] is the single source of truth for
/// which edges are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Registered but untouched.
    Created,
    /// `initialize` in progress.
    Initializing,
    /// `initialize` completed.
    Initialized,
    /// `start` in progress.
    Starting,
    /// Serving.
    Running,
    /// `stop` in progress.
    Stopping,
    /// `stop` completed; resources released.
    Stopped,
    /// A lifecycle operation failed. Terminal for the init/start path, but a
    /// failed entity may still pass through Stopping to release resources.
    Failed,
}

impl LifecycleState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Created, Initializing)
                | (Initializing, Initialized)
                | (Initializing, Failed)
                | (Initialized, Starting)
                | (Initialized, Stopping)
                | (Starting, Running)
                | (Starting, Failed)
                | (Running, Stopping)
                | (Stopping, Stopped)
                | (Stopping, Failed)
                | (Failed, Stopping)
        )
    }

    /// True once the entity can no longer move forward on the init/start path.
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Stopped | LifecycleState::Failed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Created => "created",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Starting => "starting",
            LifecycleState::Running => "running",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
