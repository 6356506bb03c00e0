// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Building neurons and simulations from a loaded configuration
//!
//! This is where the configuration's unit system is converted to the
//! internal mV/nS/pF/pA units. Durations pass through unchanged.

use serde::Serialize;
use tracing::info;

use glif_config::{GlifConfig, NeuronConfig, SimulationConfig};
use glif_neural::models::default_parameters;
use glif_neural::{
    create_model, DynGlifModel, GlifParameters, NeuronModel, ParameterUpdate, Result, Simulation,
    SimulationSettings, Step, UnitSystem,
};
use glif_observability::{LogFormat, LoggingConfig};

/// Model defaults with the configured overrides applied, in internal units
pub fn neuron_parameters(config: &NeuronConfig) -> Result<GlifParameters> {
    let units: UnitSystem = config.units.parse()?;
    let mut update = ParameterUpdate::new();

    if let Some(v) = config.threshold {
        update = update.threshold(units.voltage_to_mv(v));
    }
    if let Some(g) = config.conductance {
        update = update.conductance(units.conductance_to_ns(g));
    }
    if let Some(v) = config.leak_potential {
        update = update.leak_potential(units.voltage_to_mv(v));
    }
    if let Some(c) = config.capacitance {
        update = update.capacitance(units.capacitance_to_pf(c));
    }
    if let Some(t) = config.refractory_duration {
        update = update.refractory_duration(t);
    }
    if let Some(v) = config.reset_potential {
        update = update.reset_potential(units.voltage_to_mv(v));
    }
    if let Some(method) = &config.dynamics_method {
        update = update.dynamics_method(method.as_str());
    }
    if let Some(taus) = &config.synaptic_time_constants {
        update = update.synaptic_time_constants(taus.clone());
    }

    default_parameters(&config.model)?.merged(&update)
}

/// Instantiate the configured model with its initial voltage
pub fn build_neuron(config: &NeuronConfig) -> Result<DynGlifModel> {
    let params = neuron_parameters(config)?;
    let mut neuron = create_model(&config.model, Some(params))?;
    if let Some(v) = config.initial_voltage {
        let units: UnitSystem = config.units.parse()?;
        neuron.set_membrane_voltage(units.voltage_to_mv(v))?;
    }
    Ok(neuron)
}

pub fn simulation_settings(config: &SimulationConfig) -> SimulationSettings {
    SimulationSettings {
        resolution_ms: config.resolution_ms,
        min_delay_steps: config.min_delay_steps,
        max_delay_steps: config.max_delay_steps,
    }
}

/// Neuron, clock and DC stimulus from a full configuration
pub fn build_simulation(config: &GlifConfig) -> Result<Simulation<DynGlifModel>> {
    let settings = simulation_settings(&config.simulation);
    let neuron = build_neuron(&config.neuron)?;
    let resolution_ms = settings.resolution_ms;
    let mut sim = Simulation::new(neuron, settings)?;

    let stimulus = &config.stimulus;
    if stimulus.constant_current != 0.0 {
        let units: UnitSystem = config.neuron.units.parse()?;
        sim.set_constant_current(
            units.current_to_pa(stimulus.constant_current),
            Step::from_ms(stimulus.start_ms, resolution_ms),
        );
    }
    Ok(sim)
}

/// Console/file logging settings for the configured `[logging]` section
pub fn logging_config(config: &glif_config::LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: config.level.clone(),
        console_format: LogFormat::Text,
        file_logging: config.file_logging,
        log_dir: config.log_dir.clone(),
        ..LoggingConfig::default()
    }
}

/// Outcome of a configured run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub model: String,
    pub duration_ms: f64,
    pub resolution_ms: f64,
    pub spike_count: usize,
    /// Precise spike times (ms)
    pub spike_times_ms: Vec<f64>,
    /// Membrane voltage at the end of the run (mV)
    pub final_voltage_mv: f64,
}

/// Build the configured simulation and run it for `simulation.duration_ms`
pub fn run(config: &GlifConfig) -> Result<RunReport> {
    let mut sim = build_simulation(config)?;
    sim.run_ms(config.simulation.duration_ms)?;

    let resolution_ms = sim.settings().resolution_ms;
    let report = RunReport {
        model: sim.neuron().model_name().to_string(),
        duration_ms: sim.time_ms(),
        resolution_ms,
        spike_count: sim.spikes().len(),
        spike_times_ms: sim.spikes().times_ms(resolution_ms),
        final_voltage_mv: sim.neuron().membrane_voltage(),
    };
    info!(
        model = %report.model,
        spikes = report.spike_count,
        duration_ms = report.duration_ms,
        "Run complete"
    );
    Ok(report)
}
