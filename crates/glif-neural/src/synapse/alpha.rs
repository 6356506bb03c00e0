// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Alpha-shaped postsynaptic currents
//!
//! Each receptor is a second-order linear filter. A unit impulse, scaled by
//! `e/τs`, produces `y2(t) = (t/τs)·e^{1-t/τs}`: zero at onset, peaking at 1
//! when `t = τs`. So a spike of weight `w` peaks at `w` pA.

use crate::dynamics::AlphaPropagator;

/// Two state variables per receptor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlphaSynapses {
    /// Derivative-like state
    y1: Vec<f64>,
    /// Alpha current, pA
    y2: Vec<f64>,
}

impl AlphaSynapses {
    pub fn new(receptors: usize) -> Self {
        Self {
            y1: vec![0.0; receptors],
            y2: vec![0.0; receptors],
        }
    }

    pub fn len(&self) -> usize {
        self.y1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y1.is_empty()
    }

    /// Change the receptor count, keeping existing state
    pub fn resize(&mut self, receptors: usize) {
        self.y1.resize(receptors, 0.0);
        self.y2.resize(receptors, 0.0);
    }

    /// Σ P31·y1 + P32·y2 over all receptors (mV)
    #[inline]
    pub fn voltage_contribution(&self, propagators: &[AlphaPropagator]) -> f64 {
        propagators
            .iter()
            .zip(self.y1.iter().zip(self.y2.iter()))
            .map(|(p, (&y1, &y2))| p.p_cross_to_voltage_1 * y1 + p.p_cross_to_voltage_2 * y2)
            .sum()
    }

    /// Propagate every receptor one step, then add the impulses delivered now
    ///
    /// `impulse(i)` returns the summed spike weight due on receptor index `i`.
    #[inline]
    pub fn advance(&mut self, propagators: &[AlphaPropagator], mut impulse: impl FnMut(usize) -> f64) {
        for (i, p) in propagators.iter().enumerate() {
            self.y2[i] = p.p_cross_delta * self.y1[i] + p.p_syn_self * self.y2[i];
            self.y1[i] = self.y1[i] * p.p_syn_self + p.peak_normalization * impulse(i);
        }
    }

    /// Summed synaptic current across receptors, pA
    pub fn total_current(&self) -> f64 {
        self.y2.iter().sum()
    }

    pub fn state_1(&self) -> &[f64] {
        &self.y1
    }

    pub fn state_2(&self) -> &[f64] {
        &self.y2
    }

    pub fn clear(&mut self) {
        self.y1.iter_mut().for_each(|v| *v = 0.0);
        self.y2.iter_mut().for_each(|v| *v = 0.0);
    }
}
