use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system with tracing.
///
/// If `log_dir` is provided, logs will also be written to a daily file in that
/// directory; keep the returned guard alive until exit so buffered lines are
/// flushed. The `verbose` flag controls whether debug logs are shown.
/// `RUST_LOG` overrides both.
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let default_filter = if verbose {
        "rhythm_core=debug,rhythm_sim=debug,warn"
    } else {
        "rhythm_core=info,rhythm_sim=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);

    if let Some(dir) = log_dir {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "rhythm-core.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
            .try_init()?;
        Ok(Some(guard))
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
        Ok(None)
    }
}
