//! # Built-in Components
//!
//! Infrastructure components shipped with the kernel, replacing the global
//! "current config" and "default logger" singletons of classic scaffolding
//! frameworks: one [`ConfigComponent`] exposing the loaded configuration to
//! peers through the context, and one [`LoggingComponent`] initializing the
//! process-wide log sink.

pub mod config;
pub mod logging;

pub use config::ConfigComponent;
pub use logging::LoggingComponent;
