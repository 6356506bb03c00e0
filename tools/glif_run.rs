// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
GLIF Runner

Loads a `glif_configuration.toml`, builds the configured neuron, drives it
with the configured constant current and prints the spike report as JSON.

Usage:
  cargo run --bin glif_run -- --config glif_configuration.toml
  cargo run --bin glif_run -- --set model=glif_lif_psc --set constant_current=1500 --debug-glif-neural

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use glif::config::load_config;
use glif::neural::available_models;
use glif::observability::{debug_flags_help, init_logging, CrateDebugFlags};
use glif::setup::{logging_config, run};

/// GLIF Runner - simulate one GLIF neuron from a configuration file
#[derive(Parser, Debug)]
#[command(name = "glif_run", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Path to the configuration file (searched for if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override a setting, e.g. `--set duration_ms=250` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Pretty-print the JSON report
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// List the available models and exit
    #[arg(long, default_value_t = false)]
    list_models: bool,
}

fn parse_overrides(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut overrides = HashMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Override '{}' is not of the form KEY=VALUE", pair);
        };
        overrides.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(overrides)
}

fn main() -> Result<()> {
    // `--debug-<crate>` flags are not clap options
    let (debug_args, cli_args): (Vec<String>, Vec<String>) =
        env::args().partition(|arg| arg.starts_with("--debug-"));
    let args = Args::parse_from(cli_args);

    if args.list_models {
        for model in available_models() {
            println!("{}", model);
        }
        return Ok(());
    }

    let overrides = parse_overrides(&args.overrides)?;
    let config = load_config(args.config.as_deref(), Some(&overrides))
        .context("Failed to load GLIF configuration")?;

    let mut debug_flags = CrateDebugFlags::from_args(debug_args);
    if let Ok(value) = env::var("GLIF_DEBUG") {
        debug_flags.merge_env_value(&value);
    }
    let _logging = init_logging(&debug_flags, &logging_config(&config.logging))?;

    info!(
        model = %config.neuron.model,
        duration_ms = config.simulation.duration_ms,
        resolution_ms = config.simulation.resolution_ms,
        "Starting run"
    );
    let report = run(&config).context("Simulation failed")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}
