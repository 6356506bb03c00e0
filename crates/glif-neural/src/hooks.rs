// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host hooks
//!
//! The integrator never looks up global registries. The host passes a
//! [`SpikeSink`] for outbound spikes and an [`ObservableChannel`] for recorded
//! scalars into every `update` call.

use ahash::AHashMap;

use crate::types::{SpikeNotice, Step};

/// Receives spike notifications from a neuron
pub trait SpikeSink {
    fn emit_spike(&mut self, spike: SpikeNotice);
}

/// Receives named scalar samples (one per recordable per step)
pub trait ObservableChannel {
    fn record(&mut self, step: Step, name: &'static str, value: f64);
}

/// Discards every sample
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObservables;

impl ObservableChannel for NullObservables {
    #[inline]
    fn record(&mut self, _step: Step, _name: &'static str, _value: f64) {}
}

/// In-memory recorder keeping a time series per observable name
#[derive(Debug, Clone, Default)]
pub struct ObservableTrace {
    series: AHashMap<&'static str, Vec<(Step, f64)>>,
}

impl ObservableTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, name: &str) -> Option<&[(Step, f64)]> {
        self.series.get(name).map(|s| s.as_slice())
    }

    /// Values of one observable, in recording order
    pub fn values(&self, name: &str) -> Vec<f64> {
        self.series
            .get(name)
            .map(|s| s.iter().map(|&(_, v)| v).collect())
            .unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.series.keys().copied()
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(|s| s.is_empty())
    }
}

impl ObservableChannel for ObservableTrace {
    fn record(&mut self, step: Step, name: &'static str, value: f64) {
        self.series.entry(name).or_default().push((step, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_records_per_name() {
        let mut trace = ObservableTrace::new();
        assert!(trace.is_empty());

        trace.record(Step(0), "V_m", -70.0);
        trace.record(Step(1), "V_m", -69.5);
        trace.record(Step(1), "I", 12.0);

        assert_eq!(trace.values("V_m"), vec![-70.0, -69.5]);
        assert_eq!(trace.series("I").unwrap(), &[(Step(1), 12.0)]);
        assert!(trace.series("I_syn").is_none());
        assert!(trace.values("I_syn").is_empty());
    }
}
