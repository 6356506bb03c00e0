// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Propagator Compilation
//!
//! The sub-threshold system of one receptor is linear and time invariant:
//!
//! ```text
//! dy1/dt = -y1/τs
//! dy2/dt =  y1 - y2/τs               (y2 is the alpha current, pA)
//! dV/dt  = -(V - E_L)/τm + (I + y2)/C     τm = C/g
//! ```
//!
//! Its exact solution over one step `h` is a matrix of constant factors:
//!
//! ```text
//! P11 = P22 = exp(-h/τs)
//! P21       = h · P11
//! P33       = exp(-h/τm)                          (P_leak_exact)
//! P30       = (1 - P33)/g                         (P_leak_drive)
//! P32       = 1/C ∫₀ʰ e^{-(h-s)/τm} e^{-s/τs} ds
//! P31       = 1/C ∫₀ʰ e^{-(h-s)/τm} s e^{-s/τs} ds
//! ```
//!
//! With `k = 1/τm - 1/τs` the integrals have closed forms in `expm1(k·h)`.
//! When `τs ≈ τm` they cancel catastrophically, so below
//! `SINGULAR_LIMIT` the series in `k·h` is used instead (exact at `k = 0`).

use core::f64::consts::E;

use tracing::debug;

use crate::models::{DynamicsMethod, GlifParameters, ModelParameters};
use crate::types::{GlifError, Result};

/// Below this |k·h| the propagators switch to their series expansion
const SINGULAR_LIMIT: f64 = 1.0e-4;

/// Leak propagators shared by both dynamics methods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeakPropagator {
    /// Voltage decay over one step (P33)
    pub p_leak_exact: f64,
    /// Drive factor applied to `I + g·E_L` (P30)
    pub p_leak_drive: f64,
}

impl LeakPropagator {
    pub fn compile(conductance: f64, capacitance: f64, h: f64) -> Self {
        let tau_m = capacitance / conductance;
        let p_leak_exact = (-h / tau_m).exp();
        Self {
            p_leak_exact,
            p_leak_drive: (1.0 - p_leak_exact) / conductance,
        }
    }
}

/// Per-receptor alpha-current propagators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaPropagator {
    /// Decay of both synaptic states (P11 = P22)
    pub p_syn_self: f64,
    /// Rate term feeding state 1 into state 2 (P21)
    pub p_cross_delta: f64,
    /// Effect of state 1 on voltage (P31)
    pub p_cross_to_voltage_1: f64,
    /// Effect of state 2 on voltage (P32)
    pub p_cross_to_voltage_2: f64,
    /// Impulse scaling so a unit weight peaks at 1 (e/τs)
    pub peak_normalization: f64,
}

impl AlphaPropagator {
    pub fn compile(tau_syn: f64, tau_m: f64, capacitance: f64, h: f64) -> Self {
        let p_syn_self = (-h / tau_syn).exp();
        Self {
            p_syn_self,
            p_cross_delta: h * p_syn_self,
            p_cross_to_voltage_1: cross_to_voltage_1(tau_syn, tau_m, capacitance, h),
            p_cross_to_voltage_2: cross_to_voltage_2(tau_syn, tau_m, capacitance, h),
            peak_normalization: E / tau_syn,
        }
    }
}

fn cross_to_voltage_2(tau_syn: f64, tau_m: f64, capacitance: f64, h: f64) -> f64 {
    let k = 1.0 / tau_m - 1.0 / tau_syn;
    let x = k * h;
    let decay_m = (-h / tau_m).exp();
    if x.abs() < SINGULAR_LIMIT {
        decay_m * h * (1.0 + x / 2.0 + x * x / 6.0) / capacitance
    } else {
        decay_m * x.exp_m1() / k / capacitance
    }
}

fn cross_to_voltage_1(tau_syn: f64, tau_m: f64, capacitance: f64, h: f64) -> f64 {
    let k = 1.0 / tau_m - 1.0 / tau_syn;
    let x = k * h;
    let decay_m = (-h / tau_m).exp();
    if x.abs() < SINGULAR_LIMIT {
        decay_m * h * h * (0.5 + x / 3.0 + x * x / 8.0) / capacitance
    } else {
        let decay_s = (-h / tau_syn).exp();
        (h * decay_s / k - decay_m * x.exp_m1() / (k * k)) / capacitance
    }
}

/// Everything derived from parameters and step size (compiled once per calibration)
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficients {
    pub resolution_ms: f64,
    pub method: DynamicsMethod,
    pub leak: LeakPropagator,
    pub alpha: Vec<AlphaPropagator>,
    pub refractory_total_ms: f64,
}

impl Coefficients {
    pub fn compile(params: &GlifParameters, resolution_ms: f64) -> Result<Self> {
        if !(resolution_ms.is_finite() && resolution_ms > 0.0) {
            return Err(GlifError::InvalidResolution(resolution_ms));
        }
        params.validate()?;

        let h = resolution_ms;
        let tau_m = params.membrane_time_constant();
        let leak = LeakPropagator::compile(params.conductance, params.capacitance, h);
        let alpha: Vec<AlphaPropagator> = params
            .synaptic_time_constants
            .iter()
            .map(|&tau_syn| AlphaPropagator::compile(tau_syn, tau_m, params.capacitance, h))
            .collect();

        debug!(
            resolution_ms = h,
            tau_m,
            p_leak_exact = leak.p_leak_exact,
            p_leak_drive = leak.p_leak_drive,
            receptors = alpha.len(),
            method = params.dynamics_method.as_str(),
            "Compiled GLIF propagators"
        );

        Ok(Self {
            resolution_ms: h,
            method: params.dynamics_method,
            leak,
            alpha,
            refractory_total_ms: params.refractory_duration,
        })
    }

    pub fn receptor_count(&self) -> usize {
        self.alpha.len()
    }
}
