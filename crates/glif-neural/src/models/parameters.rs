// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! GLIF parameters, partial updates and the status dictionary
//!
//! All values are in internal units (mV, nS, pF, pA, ms). Updates are merged
//! into a copy and validated as a whole, so a rejected update leaves the
//! previous configuration untouched.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::traits::ModelParameters;
use crate::types::{GlifError, Result};

/// Voltage integration scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicsMethod {
    #[default]
    LinearForwardEuler,
    LinearExact,
}

impl DynamicsMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            DynamicsMethod::LinearForwardEuler => "linear_forward_euler",
            DynamicsMethod::LinearExact => "linear_exact",
        }
    }
}

impl FromStr for DynamicsMethod {
    type Err = GlifError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear_forward_euler" => Ok(DynamicsMethod::LinearForwardEuler),
            "linear_exact" => Ok(DynamicsMethod::LinearExact),
            other => Err(GlifError::UnknownDynamicsMethod(other.to_string())),
        }
    }
}

impl fmt::Display for DynamicsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GLIF model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlifParameters {
    /// Spike threshold (mV)
    pub threshold: f64,
    /// Leak conductance (nS)
    pub conductance: f64,
    /// Resting potential (mV)
    pub leak_potential: f64,
    /// Membrane capacitance (pF)
    pub capacitance: f64,
    /// Absolute refractory period (ms)
    pub refractory_duration: f64,
    /// Voltage on refractory exit (mV)
    pub reset_potential: f64,
    pub dynamics_method: DynamicsMethod,
    /// One alpha time constant per receptor (ms)
    #[serde(default)]
    pub synaptic_time_constants: Vec<f64>,
    #[serde(skip)]
    has_connections: bool,
}

impl GlifParameters {
    /// Defaults of the current-only variant
    pub fn lif_defaults() -> Self {
        Self {
            threshold: 26.5,
            conductance: 4.6951,
            leak_potential: -77.4,
            capacitance: 99.182,
            refractory_duration: 1.0,
            reset_potential: 0.0,
            dynamics_method: DynamicsMethod::LinearForwardEuler,
            synaptic_time_constants: Vec::new(),
            has_connections: false,
        }
    }

    /// Defaults of the alpha-synapse variant (one 2 ms receptor)
    pub fn psc_defaults() -> Self {
        Self {
            refractory_duration: 0.5,
            synaptic_time_constants: vec![2.0],
            ..Self::lif_defaults()
        }
    }

    pub fn receptor_count(&self) -> usize {
        self.synaptic_time_constants.len()
    }

    /// τm = C/g (ms)
    pub fn membrane_time_constant(&self) -> f64 {
        self.capacitance / self.conductance
    }

    /// Set once a receptor has been bound; never cleared
    pub fn has_connections(&self) -> bool {
        self.has_connections
    }

    pub(crate) fn mark_connected(&mut self) {
        self.has_connections = true;
    }

    /// Apply `update` to a copy and validate the result
    pub fn merged(&self, update: &ParameterUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(v) = update.threshold {
            next.threshold = v;
        }
        if let Some(v) = update.conductance {
            next.conductance = v;
        }
        if let Some(v) = update.leak_potential {
            next.leak_potential = v;
        }
        if let Some(v) = update.capacitance {
            next.capacitance = v;
        }
        if let Some(v) = update.refractory_duration {
            next.refractory_duration = v;
        }
        if let Some(v) = update.reset_potential {
            next.reset_potential = v;
        }
        if let Some(method) = &update.dynamics_method {
            next.dynamics_method = method.parse()?;
        }
        if let Some(taus) = &update.synaptic_time_constants {
            if self.has_connections && taus.len() < self.receptor_count() {
                return Err(GlifError::ReceptorCountLocked {
                    current: self.receptor_count(),
                    requested: taus.len(),
                });
            }
            next.synaptic_time_constants = taus.clone();
        }
        next.validate()?;
        Ok(next)
    }

    /// Parameter block of the status dictionary
    pub fn to_status(&self) -> Map<String, Value> {
        let mut map = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        map.insert("has_connections".into(), Value::Bool(self.has_connections));
        map.insert("receptor_count".into(), Value::from(self.receptor_count()));
        map
    }
}

impl Default for GlifParameters {
    fn default() -> Self {
        Self::lif_defaults()
    }
}

fn require_finite(key: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GlifError::invalid_parameter(key, "must be finite"))
    }
}

fn require_positive(key: &str, value: f64) -> Result<()> {
    require_finite(key, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(GlifError::invalid_parameter(key, "must be strictly positive"))
    }
}

impl ModelParameters for GlifParameters {
    fn validate(&self) -> Result<()> {
        require_finite("threshold", self.threshold)?;
        require_positive("conductance", self.conductance)?;
        require_finite("leak_potential", self.leak_potential)?;
        require_positive("capacitance", self.capacitance)?;
        require_finite("refractory_duration", self.refractory_duration)?;
        if self.refractory_duration < 0.0 {
            return Err(GlifError::invalid_parameter(
                "refractory_duration",
                "must not be negative",
            ));
        }
        require_finite("reset_potential", self.reset_potential)?;
        for (i, &tau) in self.synaptic_time_constants.iter().enumerate() {
            require_positive(&format!("synaptic_time_constants[{}]", i), tau)?;
        }
        Ok(())
    }
}

/// Partial parameter update; absent keys keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterUpdate {
    pub threshold: Option<f64>,
    pub conductance: Option<f64>,
    pub leak_potential: Option<f64>,
    pub capacitance: Option<f64>,
    pub refractory_duration: Option<f64>,
    pub reset_potential: Option<f64>,
    /// Parsed on merge so an unknown name is reported as such
    pub dynamics_method: Option<String>,
    pub synaptic_time_constants: Option<Vec<f64>>,
}

impl ParameterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| GlifError::invalid_parameter("status", e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn threshold(mut self, value: f64) -> Self {
        self.threshold = Some(value);
        self
    }

    pub fn conductance(mut self, value: f64) -> Self {
        self.conductance = Some(value);
        self
    }

    pub fn leak_potential(mut self, value: f64) -> Self {
        self.leak_potential = Some(value);
        self
    }

    pub fn capacitance(mut self, value: f64) -> Self {
        self.capacitance = Some(value);
        self
    }

    pub fn refractory_duration(mut self, value: f64) -> Self {
        self.refractory_duration = Some(value);
        self
    }

    pub fn reset_potential(mut self, value: f64) -> Self {
        self.reset_potential = Some(value);
        self
    }

    pub fn dynamics_method(mut self, method: impl Into<String>) -> Self {
        self.dynamics_method = Some(method.into());
        self
    }

    pub fn synaptic_time_constants(mut self, taus: Vec<f64>) -> Self {
        self.synaptic_time_constants = Some(taus);
        self
    }
}

/// A status dictionary split into parameter and state parts
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StatusUpdate {
    pub parameters: ParameterUpdate,
    pub membrane_voltage: Option<f64>,
}

/// Keys reported by `status()` that cannot be written
const READ_ONLY_STATUS_KEYS: [&str; 2] = ["has_connections", "receptor_count"];

impl StatusUpdate {
    pub(crate) fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(GlifError::invalid_parameter(
                "status",
                "expected a dictionary",
            ));
        };

        let mut parameters = map.clone();
        for key in READ_ONLY_STATUS_KEYS {
            parameters.remove(key);
        }
        let membrane_voltage = match parameters.remove("membrane_voltage") {
            None => None,
            Some(v) => {
                let v = v.as_f64().ok_or_else(|| {
                    GlifError::invalid_parameter("membrane_voltage", "must be a number")
                })?;
                require_finite("membrane_voltage", v)?;
                Some(v)
            }
        };

        Ok(Self {
            parameters: ParameterUpdate::from_json(&Value::Object(parameters))?,
            membrane_voltage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let lif = GlifParameters::lif_defaults();
        assert_eq!(lif.threshold, 26.5);
        assert_eq!(lif.refractory_duration, 1.0);
        assert_eq!(lif.receptor_count(), 0);
        assert_eq!(lif.dynamics_method, DynamicsMethod::LinearForwardEuler);

        let psc = GlifParameters::psc_defaults();
        assert_eq!(psc.refractory_duration, 0.5);
        assert_eq!(psc.synaptic_time_constants, vec![2.0]);
        assert!(!psc.has_connections());
        assert!(psc.validate().is_ok());
    }

    #[test]
    fn test_dynamics_method_parse() {
        assert_eq!(
            "linear_exact".parse::<DynamicsMethod>().unwrap(),
            DynamicsMethod::LinearExact
        );
        assert_eq!(
            "runge_kutta".parse::<DynamicsMethod>().unwrap_err(),
            GlifError::UnknownDynamicsMethod("runge_kutta".into())
        );
    }

    #[test]
    fn test_merge_is_atomic() {
        let params = GlifParameters::psc_defaults();
        let update = ParameterUpdate::new()
            .threshold(30.0)
            .capacitance(-1.0);
        let err = params.merged(&update).unwrap_err();
        assert!(matches!(err, GlifError::InvalidParameter { ref key, .. } if key == "capacitance"));
        assert_eq!(params, GlifParameters::psc_defaults());

        let merged = params.merged(&ParameterUpdate::new().threshold(30.0)).unwrap();
        assert_eq!(merged.threshold, 30.0);
        assert_eq!(merged.capacitance, params.capacitance);
    }

    #[test]
    fn test_merge_rejects_bad_values() {
        let params = GlifParameters::psc_defaults();
        for update in [
            ParameterUpdate::new().conductance(0.0),
            ParameterUpdate::new().refractory_duration(-0.1),
            ParameterUpdate::new().threshold(f64::INFINITY),
            ParameterUpdate::new().synaptic_time_constants(vec![2.0, 0.0]),
            ParameterUpdate::new().dynamics_method("rk4"),
        ] {
            assert!(params.merged(&update).is_err(), "{:?} accepted", update);
        }
        // Zero refractory period is allowed
        assert!(params
            .merged(&ParameterUpdate::new().refractory_duration(0.0))
            .is_ok());
    }

    #[test]
    fn test_receptor_count_locked_once_connected() {
        let mut params = GlifParameters::psc_defaults();
        params.synaptic_time_constants = vec![2.0, 5.0];
        params.mark_connected();

        let err = params
            .merged(&ParameterUpdate::new().synaptic_time_constants(vec![2.0]))
            .unwrap_err();
        assert_eq!(
            err,
            GlifError::ReceptorCountLocked {
                current: 2,
                requested: 1
            }
        );

        // Same length with new values, or growth, is fine
        assert!(params
            .merged(&ParameterUpdate::new().synaptic_time_constants(vec![1.0, 1.0]))
            .is_ok());
        let grown = params
            .merged(&ParameterUpdate::new().synaptic_time_constants(vec![1.0, 1.0, 8.0]))
            .unwrap();
        assert!(grown.has_connections());
    }

    #[test]
    fn test_update_from_json_rejects_unknown_keys() {
        let update = ParameterUpdate::from_json(&json!({
            "threshold": 20.0,
            "dynamics_method": "linear_exact"
        }))
        .unwrap();
        assert_eq!(update.threshold, Some(20.0));
        assert_eq!(update.dynamics_method.as_deref(), Some("linear_exact"));

        assert!(ParameterUpdate::from_json(&json!({ "V_th": 20.0 })).is_err());
    }

    #[test]
    fn test_status_round_trip_keys() {
        let status = GlifParameters::psc_defaults().to_status();
        assert_eq!(status["threshold"], json!(26.5));
        assert_eq!(status["dynamics_method"], json!("linear_forward_euler"));
        assert_eq!(status["synaptic_time_constants"], json!([2.0]));
        assert_eq!(status["has_connections"], json!(false));
        assert_eq!(status["receptor_count"], json!(1));

        // A full status dictionary can be fed back
        let update = StatusUpdate::from_json(&Value::Object(status)).unwrap();
        assert_eq!(update.parameters.threshold, Some(26.5));
        assert!(update.membrane_voltage.is_none());
    }

    #[test]
    fn test_status_update_extracts_voltage() {
        let update = StatusUpdate::from_json(&json!({ "membrane_voltage": -70.0 })).unwrap();
        assert_eq!(update.membrane_voltage, Some(-70.0));
        assert!(update.parameters.is_empty());

        assert!(StatusUpdate::from_json(&json!({ "membrane_voltage": "high" })).is_err());
        assert!(StatusUpdate::from_json(&json!([1, 2])).is_err());
    }
}
