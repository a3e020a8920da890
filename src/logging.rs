//! Tracing setup: stdout always, plus an optional non-blocking log file.

use herald_core::{config::HeraldConfig, shellexpand};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `log_level`.
///
/// The returned guard must live as long as the process or buffered file
/// output is lost.
pub fn init(cfg: &HeraldConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    let (file_layer, guard) = if cfg.log_file.is_empty() {
        (None, None)
    } else {
        let expanded = shellexpand(&cfg.log_file);
        let path = Path::new(&expanded);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("log_file has no file name: {expanded}"))?;
        std::fs::create_dir_all(dir)?;

        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}
