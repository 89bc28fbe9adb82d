/// The package version of the listings service.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The source revision, if one was provided at build time.
pub const REVISION: Option<&str> = option_env!("LISTINGS_REVISION");

pub const BUILD_TIMESTAMP: Option<&str> = option_env!("BUILD_TIMESTAMP");
