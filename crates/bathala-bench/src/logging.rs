use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Keeps the non-blocking writer alive; dropping it flushes the log.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub decisions_path: PathBuf,
}

/// Installs a JSON subscriber writing AI decision events next to the summary.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let log_dir = outputs
        .summary_md
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory at {}", log_dir.display()))?;

    let decisions_path = log_dir.join("decisions.jsonl");
    let file = File::create(&decisions_path)
        .with_context(|| format!("creating decision log at {}", decisions_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // A subscriber may already be installed when running under tests.
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(LoggingGuard {
        _guard: guard,
        decisions_path,
    }))
}
