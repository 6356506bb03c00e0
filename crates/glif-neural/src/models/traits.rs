// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron Model Traits
//!
//! A neuron goes through a fixed lifecycle driven by the host:
//!
//! ```text
//! configure ─> init_buffers(capacity) ─> calibrate(h) ─┐
//!                                                      ▼
//!            ┌── begin_slice(origin) ─> handle_* ─> update(origin, from, to)
//!            └──────────────────────────────────────────┘
//! ```
//!
//! Changing parameters invalidates the calibration; the host must calibrate
//! again before the next update.

use serde_json::Value;

use super::parameters::ParameterUpdate;
use crate::dynamics::Phase;
use crate::hooks::{ObservableChannel, SpikeSink};
use crate::synapse::{CurrentEvent, SpikeEvent};
use crate::types::{ReceptorPort, Result, Step};

/// Parameter set of a neuron model
pub trait ModelParameters: Clone + Send {
    /// Check every constraint; the first violation is returned
    fn validate(&self) -> Result<()>;
}

/// Trait implemented by every neuron model
pub trait NeuronModel: Send {
    type Parameters: ModelParameters;

    /// Registry name (e.g. `"glif_lif_psc"`)
    fn model_name(&self) -> &'static str;

    /// Names of the observables written on every step
    fn recordables(&self) -> &'static [&'static str];

    fn parameters(&self) -> &Self::Parameters;

    /// Merge a partial update atomically
    fn set_parameters(&mut self, update: &ParameterUpdate) -> Result<()>;

    fn membrane_voltage(&self) -> f64;

    fn set_membrane_voltage(&mut self, voltage_mv: f64) -> Result<()>;

    fn receptor_count(&self) -> usize;

    /// Validate a 1-based port and mark the neuron as connected
    fn connect_receptor(&mut self, port: ReceptorPort) -> Result<ReceptorPort>;

    /// Clear all buffers and size them for `capacity` steps of look-ahead
    fn init_buffers(&mut self, capacity: usize);

    /// Compile propagators for the step size and clear the refractory countdown
    fn calibrate(&mut self, resolution_ms: f64) -> Result<()>;

    fn is_calibrated(&self) -> bool;

    /// Announce the origin that delivery offsets and lags refer to
    fn begin_slice(&mut self, origin: Step);

    fn handle_spike(&mut self, event: &SpikeEvent) -> Result<()>;

    fn handle_current(&mut self, event: &CurrentEvent) -> Result<()>;

    /// Advance over lags `[from, to)` of the slice starting at `origin`
    fn update(
        &mut self,
        origin: Step,
        from: usize,
        to: usize,
        spikes: &mut dyn SpikeSink,
        observables: &mut dyn ObservableChannel,
    ) -> Result<()>;

    fn phase(&self) -> Phase;

    /// Parameters, derived flags and state as a dictionary
    fn status(&self) -> Value;

    /// Apply a status dictionary (parameters and `membrane_voltage`) atomically
    fn set_status(&mut self, status: &Value) -> Result<()>;
}

impl<M: NeuronModel + ?Sized> NeuronModel for Box<M> {
    type Parameters = M::Parameters;

    fn model_name(&self) -> &'static str {
        (**self).model_name()
    }

    fn recordables(&self) -> &'static [&'static str] {
        (**self).recordables()
    }

    fn parameters(&self) -> &Self::Parameters {
        (**self).parameters()
    }

    fn set_parameters(&mut self, update: &ParameterUpdate) -> Result<()> {
        (**self).set_parameters(update)
    }

    fn membrane_voltage(&self) -> f64 {
        (**self).membrane_voltage()
    }

    fn set_membrane_voltage(&mut self, voltage_mv: f64) -> Result<()> {
        (**self).set_membrane_voltage(voltage_mv)
    }

    fn receptor_count(&self) -> usize {
        (**self).receptor_count()
    }

    fn connect_receptor(&mut self, port: ReceptorPort) -> Result<ReceptorPort> {
        (**self).connect_receptor(port)
    }

    fn init_buffers(&mut self, capacity: usize) {
        (**self).init_buffers(capacity)
    }

    fn calibrate(&mut self, resolution_ms: f64) -> Result<()> {
        (**self).calibrate(resolution_ms)
    }

    fn is_calibrated(&self) -> bool {
        (**self).is_calibrated()
    }

    fn begin_slice(&mut self, origin: Step) {
        (**self).begin_slice(origin)
    }

    fn handle_spike(&mut self, event: &SpikeEvent) -> Result<()> {
        (**self).handle_spike(event)
    }

    fn handle_current(&mut self, event: &CurrentEvent) -> Result<()> {
        (**self).handle_current(event)
    }

    fn update(
        &mut self,
        origin: Step,
        from: usize,
        to: usize,
        spikes: &mut dyn SpikeSink,
        observables: &mut dyn ObservableChannel,
    ) -> Result<()> {
        (**self).update(origin, from, to, spikes, observables)
    }

    fn phase(&self) -> Phase {
        (**self).phase()
    }

    fn status(&self) -> Value {
        (**self).status()
    }

    fn set_status(&mut self, status: &Value) -> Result<()> {
        (**self).set_status(status)
    }
}
