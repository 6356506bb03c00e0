// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! All problems are collected and reported together. Only structural and
//! range checks live here; model-specific parameter rules are enforced when
//! the neuron is built.

use crate::types::{KNOWN_DYNAMICS_METHODS, KNOWN_MODELS, KNOWN_UNIT_SYSTEMS};
use crate::{ConfigError, ConfigResult, GlifConfig};

/// Log levels accepted in `logging.level`
const KNOWN_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &GlifConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_simulation(config, &mut errors);
    validate_neuron(config, &mut errors);
    validate_stimulus(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_simulation(config: &GlifConfig, errors: &mut Vec<ConfigValidationError>) {
    let sim = &config.simulation;
    if !(sim.resolution_ms.is_finite() && sim.resolution_ms > 0.0) {
        errors.push(invalid("simulation.resolution_ms", "must be finite and positive"));
    }
    if sim.min_delay_steps == 0 {
        errors.push(invalid("simulation.min_delay_steps", "must be at least 1"));
    }
    if sim.max_delay_steps < sim.min_delay_steps {
        errors.push(invalid(
            "simulation.max_delay_steps",
            format!(
                "must not be below min_delay_steps ({} < {})",
                sim.max_delay_steps, sim.min_delay_steps
            ),
        ));
    }
    if !(sim.duration_ms.is_finite() && sim.duration_ms >= 0.0) {
        errors.push(invalid("simulation.duration_ms", "must be finite and non-negative"));
    }
}

fn validate_neuron(config: &GlifConfig, errors: &mut Vec<ConfigValidationError>) {
    let neuron = &config.neuron;
    if neuron.model.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "neuron.model".to_string(),
        });
    } else if !KNOWN_MODELS.contains(&neuron.model.as_str()) {
        errors.push(invalid(
            "neuron.model",
            format!("'{}' is not one of {:?}", neuron.model, KNOWN_MODELS),
        ));
    }
    if !KNOWN_UNIT_SYSTEMS.contains(&neuron.units.as_str()) {
        errors.push(invalid(
            "neuron.units",
            format!("'{}' is not one of {:?}", neuron.units, KNOWN_UNIT_SYSTEMS),
        ));
    }
    if let Some(method) = &neuron.dynamics_method {
        if !KNOWN_DYNAMICS_METHODS.contains(&method.as_str()) {
            errors.push(invalid(
                "neuron.dynamics_method",
                format!("'{}' is not one of {:?}", method, KNOWN_DYNAMICS_METHODS),
            ));
        }
    }

    let finite = [
        ("neuron.threshold", neuron.threshold),
        ("neuron.leak_potential", neuron.leak_potential),
        ("neuron.reset_potential", neuron.reset_potential),
        ("neuron.initial_voltage", neuron.initial_voltage),
    ];
    for (field, value) in finite {
        if matches!(value, Some(v) if !v.is_finite()) {
            errors.push(invalid(field, "must be finite"));
        }
    }

    let positive = [
        ("neuron.conductance", neuron.conductance),
        ("neuron.capacitance", neuron.capacitance),
    ];
    for (field, value) in positive {
        if matches!(value, Some(v) if !(v.is_finite() && v > 0.0)) {
            errors.push(invalid(field, "must be finite and positive"));
        }
    }

    if matches!(neuron.refractory_duration, Some(v) if !(v.is_finite() && v >= 0.0)) {
        errors.push(invalid(
            "neuron.refractory_duration",
            "must be finite and non-negative",
        ));
    }
    if let Some(taus) = &neuron.synaptic_time_constants {
        if taus.iter().any(|&tau| !(tau.is_finite() && tau > 0.0)) {
            errors.push(invalid(
                "neuron.synaptic_time_constants",
                "every time constant must be finite and positive",
            ));
        }
    }
}

fn validate_stimulus(config: &GlifConfig, errors: &mut Vec<ConfigValidationError>) {
    let stimulus = &config.stimulus;
    if !stimulus.constant_current.is_finite() {
        errors.push(invalid("stimulus.constant_current", "must be finite"));
    }
    if !(stimulus.start_ms.is_finite() && stimulus.start_ms >= 0.0) {
        errors.push(invalid("stimulus.start_ms", "must be finite and non-negative"));
    }
}

fn validate_logging(config: &GlifConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !KNOWN_LOG_LEVELS.contains(&level.as_str()) {
        errors.push(invalid(
            "logging.level",
            format!("'{}' is not one of {:?}", config.logging.level, KNOWN_LOG_LEVELS),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GlifConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_delay_bounds() {
        let mut config = GlifConfig::default();
        config.simulation.min_delay_steps = 30;
        config.simulation.max_delay_steps = 20;

        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("simulation.max_delay_steps"));
    }

    #[test]
    fn test_unknown_names_rejected() {
        let mut config = GlifConfig::default();
        config.neuron.model = "hh_psc_alpha".to_string();
        config.neuron.units = "cgs".to_string();
        config.neuron.dynamics_method = Some("rk45".to_string());

        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("neuron.model"));
        assert!(err.contains("neuron.units"));
        assert!(err.contains("neuron.dynamics_method"));
    }

    #[test]
    fn test_missing_model() {
        let mut config = GlifConfig::default();
        config.neuron.model = String::new();
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("Missing required configuration: neuron.model"));
    }

    #[test]
    fn test_parameter_ranges() {
        let mut config = GlifConfig::default();
        config.neuron.capacitance = Some(0.0);
        config.neuron.refractory_duration = Some(-1.0);
        config.neuron.synaptic_time_constants = Some(vec![2.0, -5.0]);
        config.neuron.threshold = Some(f64::NAN);

        let err = validate_config(&config).unwrap_err().to_string();
        for field in [
            "neuron.capacitance",
            "neuron.refractory_duration",
            "neuron.synaptic_time_constants",
            "neuron.threshold",
        ] {
            assert!(err.contains(field), "{} not reported", field);
        }

        // Zero refractory period is fine
        let mut config = GlifConfig::default();
        config.neuron.refractory_duration = Some(0.0);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = GlifConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());

        config.logging.level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }
}
