// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a section of `glif_configuration.toml`. Every section
//! and field is optional in the file; missing values take the defaults below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model names accepted in `neuron.model`
pub const KNOWN_MODELS: [&str; 2] = ["glif_lif", "glif_lif_psc"];

/// Unit systems accepted in `neuron.units`
pub const KNOWN_UNIT_SYSTEMS: [&str; 2] = ["biophysical", "si"];

/// Values accepted in `neuron.dynamics_method`
pub const KNOWN_DYNAMICS_METHODS: [&str; 2] = ["linear_forward_euler", "linear_exact"];

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GlifConfig {
    pub simulation: SimulationConfig,
    pub neuron: NeuronConfig,
    pub stimulus: StimulusConfig,
    pub logging: LoggingConfig,
}

/// Clock and delay settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub resolution_ms: f64,
    /// Slice length
    pub min_delay_steps: usize,
    pub max_delay_steps: usize,
    pub duration_ms: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            resolution_ms: 0.1,
            min_delay_steps: 10,
            max_delay_steps: 20,
            duration_ms: 100.0,
        }
    }
}

/// Neuron model and parameter overrides
///
/// Voltages, conductance, capacitance and currents are in the unit system
/// named by `units`; durations are always milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeuronConfig {
    pub model: String,
    pub units: String,
    pub threshold: Option<f64>,
    pub conductance: Option<f64>,
    pub leak_potential: Option<f64>,
    pub capacitance: Option<f64>,
    pub refractory_duration: Option<f64>,
    pub reset_potential: Option<f64>,
    pub dynamics_method: Option<String>,
    pub synaptic_time_constants: Option<Vec<f64>>,
    pub initial_voltage: Option<f64>,
}

impl Default for NeuronConfig {
    fn default() -> Self {
        Self {
            model: "glif_lif".to_string(),
            units: "biophysical".to_string(),
            threshold: None,
            conductance: None,
            leak_potential: None,
            capacitance: None,
            refractory_duration: None,
            reset_potential: None,
            dynamics_method: None,
            synaptic_time_constants: None,
            initial_voltage: None,
        }
    }
}

/// Constant current injected into the neuron
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StimulusConfig {
    /// Amplitude in the neuron's unit system (pA or A)
    pub constant_current: f64,
    pub start_ms: f64,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: PathBuf,
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("./logs"),
            file_logging: false,
        }
    }
}
