use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Logger};

/// Builds the root logger: JSON records on stderr, written from a
/// background thread, tagged with the build metadata.
pub fn initialize_logger() -> Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);
    let drain = Async::new(drain).build().fuse();

    Logger::root(
        drain,
        o!("service" => "listings", "version" => info::VERSION, "revision" => info::REVISION, "build_timestamp" => info::BUILD_TIMESTAMP),
    )
}

/// Returns a logger that discards everything, for callers that have no
/// use for output (the helper binaries when run quietly, or tests).
pub fn discard() -> Logger {
    Logger::root(slog::Discard, o!())
}

/// Installs a global logger configured from `RUST_LOG`, which also
/// captures records emitted through the `log` facade by warp and hyper.
/// Logging stops when the guard is dropped.
#[cfg(feature = "env_logging")]
pub fn initialize_env_logger() -> Option<slog_scope::GlobalLoggerGuard> {
    slog_envlogger::init().ok()
}
