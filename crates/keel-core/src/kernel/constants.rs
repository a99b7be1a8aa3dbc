use std::time::Duration;

/// Total wall-clock budget shared by all `stop` calls during shutdown,
/// unless overridden by the builder or by `app.shutdown_timeout` in config.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a single component health check. Components that cannot
/// answer within this interval are reported unhealthy rather than stalling
/// the report.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Entity name used for application-level state-change events, as opposed to
/// component-level events which carry the component name.
pub const APP_ENTITY: &str = "app";
