// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Voltage integrator and refractory clock
//!
//! One call to [`VoltageIntegrator::step`] advances the membrane potential by
//! one resolution step outside the refractory period. The caller owns the
//! refractory clock and the synaptic filter so the same integrator serves
//! both the current-only and the alpha-synapse variants.

use tracing::warn;

use super::propagators::Coefficients;
use crate::models::{DynamicsMethod, GlifParameters};

/// Remaining refractory time at or below this counts as elapsed
///
/// Repeated subtraction of `h` leaves rounding residue (1.0 - 10×0.1 is not
/// exactly zero), which would otherwise add a spurious extra held step.
pub const REFRACTORY_TOLERANCE_MS: f64 = 1.0e-9;

/// Which branch of the update a neuron is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Integrating,
    Refractory,
}

/// Countdown of the absolute refractory period, in ms
///
/// Counting in milliseconds rather than steps keeps the hold duration
/// correct if the resolution changes between calibrations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RefractoryClock {
    remaining_ms: f64,
}

impl RefractoryClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the refractory period
    pub fn start(&mut self, total_ms: f64) {
        self.remaining_ms = total_ms;
    }

    /// Count down one step. Returns `true` on the step the period ends.
    pub fn tick(&mut self, resolution_ms: f64) -> bool {
        self.remaining_ms -= resolution_ms;
        if self.remaining_ms <= REFRACTORY_TOLERANCE_MS {
            self.remaining_ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }

    pub fn phase(&self) -> Phase {
        if self.is_active() {
            Phase::Refractory
        } else {
            Phase::Integrating
        }
    }

    pub fn reset(&mut self) {
        self.remaining_ms = 0.0;
    }
}

/// Sub-step offset of a threshold crossing, measured back from the end of the step
///
/// Linear interpolation between `v_old` and `v_new`. A flat step or a
/// non-finite fraction yields 0 (spike attributed to the end of the step);
/// the result is always within `[0, h]`.
pub fn spike_offset(threshold: f64, v_old: f64, v_new: f64, resolution_ms: f64) -> f64 {
    let rise = v_new - v_old;
    if rise == 0.0 {
        return 0.0;
    }
    let fraction = 1.0 - (threshold - v_old) / rise;
    if !fraction.is_finite() {
        return 0.0;
    }
    (fraction * resolution_ms).clamp(0.0, resolution_ms)
}

/// Result of one integrating step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub voltage: f64,
    /// Present when the voltage ended the step above threshold
    pub spike_offset_ms: Option<f64>,
}

/// Leak integration plus threshold test for one neuron
#[derive(Debug, Clone, Copy)]
pub struct VoltageIntegrator<'a> {
    params: &'a GlifParameters,
    coefficients: &'a Coefficients,
}

impl<'a> VoltageIntegrator<'a> {
    pub fn new(params: &'a GlifParameters, coefficients: &'a Coefficients) -> Self {
        Self {
            params,
            coefficients,
        }
    }

    /// Leak-and-drive update of `v_old` under constant `current` (pA)
    #[inline]
    pub fn leak_step(&self, v_old: f64, current: f64) -> f64 {
        let p = self.params;
        match self.coefficients.method {
            DynamicsMethod::LinearForwardEuler => {
                let h = self.coefficients.resolution_ms;
                v_old + h * (current - p.conductance * (v_old - p.leak_potential)) / p.capacitance
            }
            DynamicsMethod::LinearExact => {
                let leak = &self.coefficients.leak;
                v_old * leak.p_leak_exact + (current + p.conductance * p.leak_potential) * leak.p_leak_drive
            }
        }
    }

    /// Advance one step. `synaptic` is the summed alpha contribution (mV).
    pub fn step(&self, v_old: f64, current: f64, synaptic: f64) -> StepOutcome {
        let voltage = self.leak_step(v_old, current) + synaptic;
        let threshold = self.params.threshold;
        if voltage <= threshold {
            return StepOutcome {
                voltage,
                spike_offset_ms: None,
            };
        }

        let h = self.coefficients.resolution_ms;
        let rise = voltage - v_old;
        if rise == 0.0 || !rise.is_finite() {
            warn!(
                v_old,
                voltage,
                threshold,
                "Degenerate threshold crossing, spike attributed to end of step"
            );
        }
        StepOutcome {
            voltage,
            spike_offset_ms: Some(spike_offset(threshold, v_old, voltage, h)),
        }
    }
}
