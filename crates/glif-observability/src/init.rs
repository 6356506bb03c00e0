// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Installs the global `tracing` subscriber: a console layer filtered by the
//! base level and the per-crate debug flags, plus (feature `file-logging`) a
//! JSON file layer written into `log_dir/run_<timestamp>/glif.log`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

/// Run folder name format: `run_YYYYMMDD_HHMMSS`
const RUN_FOLDER_FORMAT: &str = "run_%Y%m%d_%H%M%S";

/// Keeps non-blocking writers flushing until dropped
///
/// Hold this in `main` for the lifetime of the program.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    run_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Folder receiving this run's log files, if file logging is active
    pub fn run_dir(&self) -> Option<&Path> {
        self.run_dir.as_deref()
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber
///
/// Fails if the filter does not parse, the run folder cannot be created, or
/// a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter_string = debug_flags.to_filter_string(&config.level.to_lowercase());
    let console_filter = EnvFilter::try_new(&filter_string)
        .with_context(|| format!("Invalid log filter '{}'", filter_string))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let console = tracing_subscriber::fmt::layer().with_target(true);
    layers.push(match config.console_format {
        LogFormat::Text => console.with_filter(console_filter).boxed(),
        LogFormat::Json => console.json().with_filter(console_filter).boxed(),
    });

    #[cfg(feature = "file-logging")]
    let (file_guard, run_dir) = if config.file_logging {
        let (layer, file_guard, run_dir) = file_layer(config, &filter_string)?;
        layers.push(layer);
        (Some(file_guard), Some(run_dir))
    } else {
        (None, None)
    };
    #[cfg(not(feature = "file-logging"))]
    let run_dir: Option<PathBuf> = None;

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    #[cfg(not(feature = "file-logging"))]
    if config.file_logging {
        tracing::warn!("File logging requested but the file-logging feature is disabled");
    }

    tracing::debug!(filter = %filter_string, run_dir = ?run_dir, "Logging initialized");
    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guard: file_guard,
        run_dir,
    })
}

/// JSON layer writing `run_<timestamp>/glif.log` under `log_dir`
#[cfg(feature = "file-logging")]
fn file_layer(
    config: &LoggingConfig,
    filter_string: &str,
) -> Result<(BoxedLayer, tracing_appender::non_blocking::WorkerGuard, PathBuf)> {
    let run_dir = create_run_dir(&config.log_dir, Utc::now())?;
    cleanup_old_runs(&config.log_dir, config.retention_runs.max(1))?;

    let appender = tracing_appender::rolling::never(&run_dir, "glif.log");
    let (writer, file_guard) = tracing_appender::non_blocking(appender);
    let file_filter = EnvFilter::try_new(filter_string)
        .with_context(|| format!("Invalid log filter '{}'", filter_string))?;
    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(file_filter)
        .boxed();
    Ok((layer, file_guard, run_dir))
}

/// Create `log_dir/run_<timestamp>` for a run started at `started`
pub fn create_run_dir(log_dir: &Path, started: DateTime<Utc>) -> Result<PathBuf> {
    let run_dir = log_dir.join(started.format(RUN_FOLDER_FORMAT).to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create log folder {}", run_dir.display()))?;
    Ok(run_dir)
}

/// Start time encoded in a run folder name
pub fn parse_run_folder(name: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(name, RUN_FOLDER_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Delete all but the newest `keep` run folders under `log_dir`
///
/// Entries that are not run folders are left alone. Returns how many
/// folders were removed.
pub fn cleanup_old_runs(log_dir: &Path, keep: usize) -> Result<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let mut runs: Vec<(DateTime<Utc>, PathBuf)> = fs::read_dir(log_dir)
        .with_context(|| format!("Failed to read log folder {}", log_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let started = parse_run_folder(entry.file_name().to_str()?)?;
            Some((started, entry.path()))
        })
        .collect();

    if runs.len() <= keep {
        return Ok(0);
    }

    // Newest first
    runs.sort_by(|a, b| b.0.cmp(&a.0));
    let mut removed = 0;
    for (_, path) in runs.into_iter().skip(keep) {
        fs::remove_dir_all(&path)
            .with_context(|| format!("Failed to remove old log folder {}", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn test_run_folder_name_round_trips_to_start_time() {
        let dir = TempDir::new().unwrap();
        let run_dir = create_run_dir(dir.path(), at(0)).unwrap();
        assert!(run_dir.is_dir());

        let name = run_dir.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("run_"));
        assert_eq!(parse_run_folder(name), Some(at(0)));
        assert_eq!(parse_run_folder("notes"), None);
    }

    #[test]
    fn test_cleanup_keeps_newest_runs() {
        let dir = TempDir::new().unwrap();
        for seconds in [0, 10, 20, 30] {
            create_run_dir(dir.path(), at(seconds)).unwrap();
        }
        fs::create_dir(dir.path().join("keep_me")).unwrap();

        assert_eq!(cleanup_old_runs(dir.path(), 2).unwrap(), 2);

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.contains(&"keep_me".to_string()));
        assert!(remaining.contains(&at(30).format(RUN_FOLDER_FORMAT).to_string()));
        assert!(remaining.contains(&at(20).format(RUN_FOLDER_FORMAT).to_string()));
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let dir = TempDir::new().unwrap();
        assert_eq!(cleanup_old_runs(&dir.path().join("absent"), 1).unwrap(), 0);
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };
        let flags = CrateDebugFlags::default();
        let _guard = init_logging(&flags, &config).unwrap();
        assert!(init_logging(&flags, &config).is_err());
    }
}
