/*!
 * Structured logging for service components.
 *
 * Every service holds an slog child logger tagged with its component name,
 * all descending from one async root drain. HTTP request tracing lives in
 * `crate::tracing`; this module only covers the service-level loggers.
 */

use slog::{o, Drain, Logger};
use slog_async::Async;
use slog_term::{FullFormat, TermDecorator};

/// Options for the root slog drain.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Records buffered by the async drain before log calls start blocking.
    pub channel_size: usize,
    /// Force ANSI color even when stdout is not a terminal.
    pub force_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            channel_size: 2048,
            force_color: false,
        }
    }
}

/// Builds the root logger that every component logger descends from.
///
/// The crate version rides on every record so logs from mixed deployments
/// can be told apart.
pub fn setup_logger(config: LoggerConfig) -> Logger {
    let decorator = if config.force_color {
        TermDecorator::new().force_color().build()
    } else {
        TermDecorator::new().build()
    };

    let drain = FullFormat::new(decorator).build().fuse();
    let drain = Async::new(drain)
        .chan_size(config.channel_size)
        .build()
        .fuse();

    Logger::root(
        drain,
        o!(
            "service" => "procura-api",
            "version" => env!("CARGO_PKG_VERSION"),
        ),
    )
}

/// Child logger for a named service component.
pub fn component_logger(root: &Logger, component: &'static str) -> Logger {
    root.new(o!("component" => component))
}
