use std::sync::Mutex;

use slog::Drain;
use slog::{Discard, Fuse};
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Logger};

/// Builds the root logger: JSON lines on stderr, written from a
/// background thread, tagged with the build metadata.
pub fn initialize_logger() -> Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);
    let drain = Async::new(drain).build().fuse();

    Logger::root(
        drain,
        o!(
            "service" => info::SERVICE_NAME,
            "version" => info::VERSION,
            "revision" => info::REVISION,
            "build_timestamp" => info::BUILD_TIMESTAMP
        ),
    )
}

/// A logger that drops every record. Useful in tests.
pub fn discard_logger() -> Logger {
    Logger::root(Discard, o!())
}
