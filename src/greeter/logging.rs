use std::io;
use tracing::dispatcher::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, registry, EnvFilter, Layer};

use crate::greeter::config::{Config, Logging};

// This is a helper struct to store the logger guards. When they are dropped, logging can be reset.
#[allow(dead_code)]
pub struct LogGuards {
    log_guard: Option<WorkerGuard>,
    default: DefaultGuard,
}

/// Logging for the main thread of the binaries. Writes to stderr so that
/// stdout stays reserved for the greeting lines.
pub fn init_std_err_logging_thread_local() -> DefaultGuard {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let collector =
        registry().with(fmt::Layer::new().with_writer(io::stderr).with_filter(filter));
    tracing::subscriber::set_default(collector)
}

/// Per-member logging, set thread-local on each member thread. Only rank 0
/// logs to the console; with file logging enabled every rank writes its own
/// log file into the output directory.
pub(crate) fn init_logging(config: &Config, rank: u32) -> LogGuards {
    let (log_layer, log_guard) = if Logging::Info == config.output().logging {
        std::fs::create_dir_all(&config.output().output_dir).expect("Failed to create output path");
        let log_file_name = format!("log_process_{rank}.txt");
        let log_file_appender = rolling::never(&config.output().output_dir, log_file_name);
        let (log_file, log_guard) = non_blocking(log_file_appender);
        let layer = fmt::Layer::new()
            .with_writer(log_file)
            .json()
            .with_ansi(false)
            .with_filter(LevelFilter::INFO);
        (Some(layer), Some(log_guard))
    } else {
        (None, None)
    };

    let console_layer = (rank == 0).then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_filter(LevelFilter::INFO)
    });

    // Add `Optional`s. If None, then the corresponding layer is not added.
    let collector = registry().with(log_layer).with(console_layer);
    let default = tracing::subscriber::set_default(collector);

    LogGuards { log_guard, default }
}
