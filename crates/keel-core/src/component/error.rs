use thiserror::Error;

/// Errors raised by the component registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Component names must be non-empty.
    #[error("component name must not be empty")]
    EmptyName,

    /// A component with the same name is already registered.
    #[error("component '{0}' is already registered")]
    DuplicateName(String),

    /// The registry is immutable once the application has begun running.
    #[error("registry is frozen; '{operation}' is only permitted before run")]
    Frozen { operation: &'static str },

    /// The named component is not registered.
    #[error("unknown component '{0}'")]
    Unknown(String),
}
