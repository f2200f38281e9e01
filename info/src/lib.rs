//! Build metadata shared by the service and its logger.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const REVISION: Option<&str> = option_env!("BACKEND_REVISION");

pub const BUILD_TIMESTAMP: Option<&str> = option_env!("BUILD_TIMESTAMP");

/// The name the service reports in its logs and health checks.
pub const SERVICE_NAME: &str = "videos";
