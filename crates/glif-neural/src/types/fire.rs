// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fire structures for tracking neural activity

use serde::{Deserialize, Serialize};

use super::ids::Step;
use crate::hooks::SpikeSink;

/// One outbound spike: the step it is attributed to plus a sub-step offset
///
/// The precise spike time is `step * h - offset_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeNotice {
    /// Step following the one in which the threshold was crossed
    pub step: Step,
    /// Lag (within the slice) of the crossing step
    pub lag: usize,
    /// Interpolated offset back from the end of the crossing step, in `[0, h]`
    pub offset_ms: f64,
}

impl SpikeNotice {
    pub fn precise_time_ms(&self, resolution_ms: f64) -> f64 {
        self.step.to_ms(resolution_ms) - self.offset_ms
    }
}

/// Spike train - spikes emitted by one neuron, in emission order
#[derive(Debug, Clone, Default)]
pub struct SpikeTrain {
    spikes: Vec<SpikeNotice>,
}

impl SpikeTrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spike: SpikeNotice) {
        self.spikes.push(spike);
    }

    pub fn clear(&mut self) {
        self.spikes.clear();
    }

    pub fn len(&self) -> usize {
        self.spikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spikes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpikeNotice> + '_ {
        self.spikes.iter()
    }

    pub fn as_slice(&self) -> &[SpikeNotice] {
        &self.spikes
    }

    /// Steps of all spikes
    pub fn steps(&self) -> Vec<Step> {
        self.spikes.iter().map(|s| s.step).collect()
    }

    /// Precise spike times in milliseconds
    pub fn times_ms(&self, resolution_ms: f64) -> Vec<f64> {
        self.spikes
            .iter()
            .map(|s| s.precise_time_ms(resolution_ms))
            .collect()
    }
}

impl SpikeSink for SpikeTrain {
    fn emit_spike(&mut self, spike: SpikeNotice) {
        self.add(spike);
    }
}
