// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # glif-observability
//!
//! Logging setup shared by the GLIF tools.
//!
//! Library crates only emit `tracing` events; binaries call
//! [`init_logging`] once to install a console layer and, with the
//! `file-logging` feature, a JSON file layer in a timestamped run folder.
//! Per-crate debug output is enabled with `--debug-<crate>` flags or the
//! `GLIF_DEBUG` environment variable.
//!
//! ## Features
//! - `file-logging`: JSON log files through a non-blocking writer

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known GLIF crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &["glif", "glif-neural", "glif-config", "glif-observability"];
