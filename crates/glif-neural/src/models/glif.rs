// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # GLIF Neuron Core
//!
//! Shared implementation of the GLIF variants. A variant only contributes a
//! name, defaults, its recordables and any extra parameter constraint; the
//! state machine and update loop are common.
//!
//! ## Per-lag update
//!
//! ```text
//! if refractory:
//!     remaining -= h
//!     V = V_reset if remaining elapsed else V_old
//! else:
//!     V = leak_step(V_old, I) + Σ P31·y1 + P32·y2
//!     if V > θ:
//!         enter refractory
//!         emit spike at origin + lag + 1, offset = (1 - (θ - V_old)/(V - V_old))·h
//! y2 = P21·y1 + P22·y2 ; y1 = P11·y1 + (e/τs)·spikes[lag]
//! I  = currents[lag]
//! record at origin + lag
//! ```
//!
//! The voltage always sees the synaptic state of the previous step, and the
//! current read at lag `k` drives the step at lag `k + 1`.

use core::fmt;
use core::marker::PhantomData;

use serde_json::Value;
use tracing::{debug, info, trace};

use super::parameters::{GlifParameters, ParameterUpdate, StatusUpdate};
use super::traits::{ModelParameters, NeuronModel};
use crate::buffer::{RingBuffer, RingBufferBank};
use crate::dynamics::{Coefficients, Phase, RefractoryClock, VoltageIntegrator};
use crate::hooks::{ObservableChannel, SpikeSink};
use crate::synapse::{AlphaSynapses, CurrentEvent, SpikeEvent};
use crate::types::{GlifError, ReceptorPort, Result, SpikeNotice, Step};

/// Observable: membrane voltage (mV)
pub const V_M: &str = "V_m";
/// Observable: injected current sampled for the next step (pA)
pub const I_INJECTED: &str = "I";
/// Observable: summed alpha current (pA)
pub const I_SYN: &str = "I_syn";

/// Buffer capacity used until the host calls `init_buffers`
const DEFAULT_BUFFER_CAPACITY: usize = 2;

/// What distinguishes one GLIF variant from another
pub trait GlifVariant: fmt::Debug + Send + 'static {
    const NAME: &'static str;
    const RECORDABLES: &'static [&'static str];

    fn default_parameters() -> GlifParameters;

    /// Constraint on top of the shared parameter validation
    fn check(_params: &GlifParameters) -> Result<()> {
        Ok(())
    }
}

/// GLIF neuron of variant `V`
pub struct GlifNeuron<V: GlifVariant> {
    params: GlifParameters,
    membrane_voltage: f64,
    injected_current: f64,
    synapses: AlphaSynapses,
    refractory: RefractoryClock,
    /// `None` until calibrated, and again after any parameter change
    coefficients: Option<Coefficients>,
    spikes: RingBufferBank,
    currents: RingBuffer,
    _variant: PhantomData<V>,
}

impl<V: GlifVariant> GlifNeuron<V> {
    pub fn new() -> Self {
        let params = V::default_parameters();
        let receptors = params.receptor_count();
        Self {
            params,
            membrane_voltage: 0.0,
            injected_current: 0.0,
            synapses: AlphaSynapses::new(receptors),
            refractory: RefractoryClock::new(),
            coefficients: None,
            spikes: RingBufferBank::new(receptors, DEFAULT_BUFFER_CAPACITY),
            currents: RingBuffer::new(DEFAULT_BUFFER_CAPACITY),
            _variant: PhantomData,
        }
    }

    /// Build with validated parameters
    pub fn with_parameters(params: GlifParameters) -> Result<Self> {
        let mut neuron = Self::new();
        neuron.replace_parameters(params)?;
        Ok(neuron)
    }

    pub fn synapses(&self) -> &AlphaSynapses {
        &self.synapses
    }

    pub fn injected_current(&self) -> f64 {
        self.injected_current
    }

    pub fn coefficients(&self) -> Option<&Coefficients> {
        self.coefficients.as_ref()
    }

    pub fn refractory_remaining_ms(&self) -> f64 {
        self.refractory.remaining_ms()
    }

    fn observable(&self, name: &str) -> f64 {
        match name {
            I_INJECTED => self.injected_current,
            I_SYN => self.synapses.total_current(),
            _ => self.membrane_voltage,
        }
    }

    fn check_port(&self, port: ReceptorPort) -> Result<usize> {
        let receptor_count = self.params.receptor_count();
        if port.0 == 0 || port.0 > receptor_count {
            return Err(GlifError::InvalidReceptor {
                port: port.0,
                receptor_count,
                model: V::NAME,
            });
        }
        Ok(port.index())
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        let capacity = self.currents.capacity();
        if offset >= capacity {
            return Err(GlifError::DeliveryOutOfRange { offset, capacity });
        }
        Ok(())
    }

    /// Commit a fully validated parameter set
    ///
    /// Receptor-sized state follows the new count. Fails without side
    /// effects if the spike buffers would have to drop pending input.
    fn replace_parameters(&mut self, next: GlifParameters) -> Result<()> {
        next.validate()?;
        V::check(&next)?;

        let receptors = next.receptor_count();
        self.spikes.resize(receptors)?;
        self.synapses.resize(receptors);
        self.params = next;
        self.coefficients = None;
        Ok(())
    }
}

impl<V: GlifVariant> Default for GlifNeuron<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: GlifVariant> fmt::Debug for GlifNeuron<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(V::NAME)
            .field("params", &self.params)
            .field("membrane_voltage", &self.membrane_voltage)
            .field("injected_current", &self.injected_current)
            .field("synapses", &self.synapses)
            .field("refractory", &self.refractory)
            .field("calibrated", &self.coefficients.is_some())
            .finish()
    }
}

/// Copies parameters and state. The copy gets empty buffers of the same
/// size and must be calibrated before it is updated.
impl<V: GlifVariant> Clone for GlifNeuron<V> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            membrane_voltage: self.membrane_voltage,
            injected_current: self.injected_current,
            synapses: self.synapses.clone(),
            refractory: RefractoryClock::new(),
            coefficients: None,
            spikes: RingBufferBank::new(self.spikes.len(), self.spikes.capacity()),
            currents: RingBuffer::new(self.currents.capacity()),
            _variant: PhantomData,
        }
    }
}

impl<V: GlifVariant> NeuronModel for GlifNeuron<V> {
    type Parameters = GlifParameters;

    fn model_name(&self) -> &'static str {
        V::NAME
    }

    fn recordables(&self) -> &'static [&'static str] {
        V::RECORDABLES
    }

    fn parameters(&self) -> &GlifParameters {
        &self.params
    }

    fn set_parameters(&mut self, update: &ParameterUpdate) -> Result<()> {
        let next = self.params.merged(update)?;
        self.replace_parameters(next)?;
        info!(
            model = V::NAME,
            receptors = self.params.receptor_count(),
            method = self.params.dynamics_method.as_str(),
            "Merged GLIF parameter update"
        );
        Ok(())
    }

    fn membrane_voltage(&self) -> f64 {
        self.membrane_voltage
    }

    fn set_membrane_voltage(&mut self, voltage_mv: f64) -> Result<()> {
        if !voltage_mv.is_finite() {
            return Err(GlifError::invalid_parameter(
                "membrane_voltage",
                "must be finite",
            ));
        }
        self.membrane_voltage = voltage_mv;
        Ok(())
    }

    fn receptor_count(&self) -> usize {
        self.params.receptor_count()
    }

    fn connect_receptor(&mut self, port: ReceptorPort) -> Result<ReceptorPort> {
        self.check_port(port)?;
        if !self.params.has_connections() {
            debug!(model = V::NAME, %port, "First receptor bound, receptor count locked");
        }
        self.params.mark_connected();
        Ok(port)
    }

    fn init_buffers(&mut self, capacity: usize) {
        self.spikes = RingBufferBank::new(self.params.receptor_count(), capacity);
        self.spikes.set_origin(self.currents.origin());
        self.currents.reset(capacity);
    }

    fn calibrate(&mut self, resolution_ms: f64) -> Result<()> {
        let coefficients = Coefficients::compile(&self.params, resolution_ms)?;
        self.synapses.resize(coefficients.receptor_count());
        self.refractory.reset();
        self.coefficients = Some(coefficients);
        Ok(())
    }

    fn is_calibrated(&self) -> bool {
        self.coefficients.is_some()
    }

    fn begin_slice(&mut self, origin: Step) {
        self.spikes.set_origin(origin);
        self.currents.set_origin(origin);
    }

    fn handle_spike(&mut self, event: &SpikeEvent) -> Result<()> {
        let receptor = self.check_port(event.receptor)?;
        self.check_offset(event.delivery_offset)?;
        self.spikes
            .add_value(receptor, event.delivery_offset, event.amount());
        Ok(())
    }

    fn handle_current(&mut self, event: &CurrentEvent) -> Result<()> {
        self.check_offset(event.delivery_offset)?;
        self.currents.add_value(event.delivery_offset, event.amount());
        Ok(())
    }

    fn update(
        &mut self,
        origin: Step,
        from: usize,
        to: usize,
        spikes: &mut dyn SpikeSink,
        observables: &mut dyn ObservableChannel,
    ) -> Result<()> {
        if from > to {
            return Err(GlifError::InvalidLagRange { from, to });
        }
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(GlifError::NotCalibrated(V::NAME))?;
        let integrator = VoltageIntegrator::new(&self.params, coefficients);
        let h = coefficients.resolution_ms;
        let mut v_old = self.membrane_voltage;

        for lag in from..to {
            if self.refractory.is_active() {
                self.membrane_voltage = if self.refractory.tick(h) {
                    self.params.reset_potential
                } else {
                    v_old
                };
            } else {
                let synaptic = self.synapses.voltage_contribution(&coefficients.alpha);
                let outcome = integrator.step(v_old, self.injected_current, synaptic);
                self.membrane_voltage = outcome.voltage;

                if let Some(offset_ms) = outcome.spike_offset_ms {
                    self.refractory.start(coefficients.refractory_total_ms);
                    let spike = SpikeNotice {
                        step: origin.offset(lag + 1),
                        lag,
                        offset_ms,
                    };
                    trace!(
                        model = V::NAME,
                        step = spike.step.0,
                        offset_ms,
                        v_old,
                        voltage = outcome.voltage,
                        "Spike"
                    );
                    spikes.emit_spike(spike);
                }
            }

            let bank = &mut self.spikes;
            self.synapses
                .advance(&coefficients.alpha, |receptor| bank.get_value(receptor, lag));
            self.injected_current = self.currents.get_value(lag);

            let step = origin.offset(lag);
            for &name in V::RECORDABLES {
                observables.record(step, name, self.observable(name));
            }

            v_old = self.membrane_voltage;
        }
        Ok(())
    }

    fn phase(&self) -> Phase {
        self.refractory.phase()
    }

    fn status(&self) -> Value {
        let mut map = self.params.to_status();
        map.insert("membrane_voltage".into(), Value::from(self.membrane_voltage));
        for &name in V::RECORDABLES {
            if name != V_M {
                map.insert(name.into(), Value::from(self.observable(name)));
            }
        }
        Value::Object(map)
    }

    fn set_status(&mut self, status: &Value) -> Result<()> {
        let mut status = status.clone();
        if let Value::Object(map) = &mut status {
            for &name in V::RECORDABLES {
                if name != V_M {
                    map.remove(name);
                }
            }
        }
        let update = StatusUpdate::from_json(&status)?;
        let next = self.params.merged(&update.parameters)?;
        if next != self.params {
            self.replace_parameters(next)?;
        }
        if let Some(voltage) = update.membrane_voltage {
            self.membrane_voltage = voltage;
        }
        Ok(())
    }
}
