//! # Keel Core Kernel
//!
//! The `kernel` module is the heart of the framework. It owns the application
//! state machine and drives every registered component through its lifecycle.
//!
//! ## Key responsibilities & components:
//!
//! - **Bootstrap & lifecycle engine**: the [`Application`](bootstrap::Application)
//!   struct registers components, resolves an execution plan, and performs
//!   ordered initialization, startup, and supervised shutdown.
//! - **Hooks**: user callables invoked at six fixed lifecycle points, managed
//!   by the [`HookRegistry`](hooks::HookRegistry).
//! - **State machine**: the [`LifecycleState`](state::LifecycleState) enum and
//!   its transition table, shared by the application and every component record.
//! - **Signals**: process-signal handling and the external
//!   [`ShutdownHandle`](signal::ShutdownHandle) trigger.
//! - **Error handling**: the top-level [`Error`](error::Error) enum and the
//!   crate-wide `Result` alias.

pub mod bootstrap;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod signal;
pub mod state;

pub use bootstrap::Application;
pub use error::{Error, LifecycleError, Result};
pub use hooks::{Hook, HookPoint, HookRegistry};
pub use signal::ShutdownHandle;
pub use state::LifecycleState;

#[cfg(test)]
mod tests;
