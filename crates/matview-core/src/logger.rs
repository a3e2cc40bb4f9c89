//! Diagnostics: stderr logging, an optional tracing subscriber, and the
//! debug print used while prototyping matrix pipelines.
//!
//! Records are written as `[seconds-since-init LEVEL target] message`.

use std::fmt::Debug;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};
use nalgebra::DMatrix;

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct StderrLogger {
    max_level: LevelFilter,
    epoch: Instant,
}

impl StderrLogger {
    fn format(&self, record: &Record) -> String {
        format!(
            "[{:8.3}s {:<5} {}] {}",
            self.epoch.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = self.format(record);
            let _ = writeln!(std::io::stderr().lock(), "{line}");
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static STDERR_LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Route `log` records at or above `level` to stderr.
///
/// Only the first call installs the logger and fixes its level; later calls
/// return `Ok(())` without changing anything.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if STDERR_LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = STDERR_LOGGER.get_or_init(|| StderrLogger {
        max_level: level,
        epoch: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`
/// (default `info`), as JSON lines or as text with uptime stamps.
///
/// The subscriber also forwards `log` records, so the `log::` calls in this
/// crate show up without a separate bridge. Does nothing if a global
/// subscriber is already set.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

/// Log `label = value` at debug level.
pub fn debug_print<T: Debug + ?Sized>(label: &str, value: &T) {
    log::debug!("{label} = {value:?}");
}

/// One-line shape and value summary of a matrix, e.g. for [`debug_print`].
pub fn matrix_summary(m: &DMatrix<f64>) -> String {
    if m.is_empty() {
        return format!("{}x{} (empty)", m.nrows(), m.ncols());
    }
    format!(
        "{}x{} min={:.4} max={:.4} mean={:.4}",
        m.nrows(),
        m.ncols(),
        m.min(),
        m.max(),
        m.mean()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_shape_and_stats() {
        let m = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(
            matrix_summary(&m),
            "2x2 min=0.0000 max=3.0000 mean=1.5000"
        );
        assert_eq!(matrix_summary(&DMatrix::zeros(0, 1)), "0x1 (empty)");
    }

    #[test]
    fn record_line_carries_level_and_target() {
        let logger = StderrLogger {
            max_level: LevelFilter::Info,
            epoch: Instant::now(),
        };
        let line = logger.format(
            &Record::builder()
                .args(format_args!("placed 3 windows"))
                .level(log::Level::Warn)
                .target("matview::monitor")
                .build(),
        );
        assert!(line.starts_with('['), "{line}");
        assert!(
            line.ends_with("s WARN  matview::monitor] placed 3 windows"),
            "{line}"
        );
        assert!(logger.enabled(&Metadata::builder().level(log::Level::Info).build()));
        assert!(!logger.enabled(&Metadata::builder().level(log::Level::Debug).build()));
    }

    #[test]
    fn init_is_idempotent() {
        init_with_level(LevelFilter::Debug).expect("first init");
        init_with_level(LevelFilter::Trace).expect("second init is a no-op");
        debug_print("shape", &(3, 4));
    }
}
