// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Slice-based host for driving one neuron.

Time advances in slices of `min_delay_steps`. Each slice has a delivery phase
(inbox and DC source write into the neuron's buffers) followed by an update
phase over lags `[0, slice_len)`. Buffers hold `min_delay + max_delay` steps,
so any event due within that window can be written ahead of time.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::hooks::ObservableTrace;
use crate::models::{NeuronModel, ParameterUpdate};
use crate::synapse::{CurrentEvent, SpikeEvent};
use crate::types::{GlifError, ReceptorPort, Result, SpikeTrain, Step};

/// Step size and delay bounds of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub resolution_ms: f64,
    /// Slice length in steps
    pub min_delay_steps: usize,
    pub max_delay_steps: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            resolution_ms: 0.1,
            min_delay_steps: 10,
            max_delay_steps: 20,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution_ms.is_finite() && self.resolution_ms > 0.0) {
            return Err(GlifError::InvalidResolution(self.resolution_ms));
        }
        if self.min_delay_steps == 0 {
            return Err(GlifError::InvalidSettings(
                "min_delay_steps must be at least 1".into(),
            ));
        }
        if self.max_delay_steps < self.min_delay_steps {
            return Err(GlifError::InvalidSettings(format!(
                "max_delay_steps ({}) must not be below min_delay_steps ({})",
                self.max_delay_steps, self.min_delay_steps
            )));
        }
        Ok(())
    }

    /// Ring buffer capacity: one slice plus the longest delay
    pub fn buffer_capacity(&self) -> usize {
        self.min_delay_steps + self.max_delay_steps
    }
}

/// Event waiting in an inbox, addressed by absolute delivery step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PendingEvent {
    Spike {
        delivery: Step,
        receptor: ReceptorPort,
        weight: f64,
        multiplicity: u32,
    },
    Current {
        delivery: Step,
        weight: f64,
        current: f64,
    },
}

impl PendingEvent {
    pub fn delivery(&self) -> Step {
        match self {
            PendingEvent::Spike { delivery, .. } | PendingEvent::Current { delivery, .. } => {
                *delivery
            }
        }
    }
}

/// Thread-safe mailbox of one receiving neuron
///
/// Producers push from any thread; the host drains between slices.
#[derive(Debug, Clone, Default)]
pub struct EventInbox {
    queue: Arc<Mutex<Vec<PendingEvent>>>,
}

impl EventInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: PendingEvent) {
        self.queue.lock().push(event);
    }

    pub fn push_spike(&self, delivery: Step, receptor: ReceptorPort, weight: f64) {
        self.push(PendingEvent::Spike {
            delivery,
            receptor,
            weight,
            multiplicity: 1,
        });
    }

    pub fn push_current(&self, delivery: Step, current: f64) {
        self.push(PendingEvent::Current {
            delivery,
            weight: 1.0,
            current,
        });
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Take events due in `[origin, origin + window)`
    ///
    /// Later events stay queued. Events already in the past can no longer be
    /// delivered and are dropped.
    pub fn drain_due(&self, origin: Step, window: usize) -> Vec<PendingEvent> {
        let mut queue = self.queue.lock();
        let mut due = Vec::new();
        let mut late = 0usize;
        queue.retain(|event| {
            let ahead = event.delivery().steps_since(origin);
            if ahead < 0 {
                late += 1;
                false
            } else if (ahead as usize) < window {
                due.push(*event);
                false
            } else {
                true
            }
        });
        drop(queue);

        if late > 0 {
            warn!(
                origin = origin.0,
                dropped = late,
                "Dropped inbound events whose delivery step already passed"
            );
        }
        due.sort_by_key(PendingEvent::delivery);
        due
    }
}

/// Constant current source
#[derive(Debug, Clone, Copy, PartialEq)]
struct DcSource {
    amplitude_pa: f64,
    start: Step,
}

/// One neuron driven through slices
#[derive(Debug)]
pub struct Simulation<N: NeuronModel> {
    neuron: N,
    settings: SimulationSettings,
    clock: Step,
    inbox: EventInbox,
    dc: Option<DcSource>,
    spikes: SpikeTrain,
    trace: ObservableTrace,
    rejected_events: usize,
}

impl<N: NeuronModel> Simulation<N> {
    pub fn new(mut neuron: N, settings: SimulationSettings) -> Result<Self> {
        settings.validate()?;
        neuron.init_buffers(settings.buffer_capacity());
        neuron.calibrate(settings.resolution_ms)?;
        debug!(
            model = neuron.model_name(),
            resolution_ms = settings.resolution_ms,
            slice_steps = settings.min_delay_steps,
            capacity = settings.buffer_capacity(),
            "Simulation ready"
        );
        Ok(Self {
            neuron,
            settings,
            clock: Step::ZERO,
            inbox: EventInbox::new(),
            dc: None,
            spikes: SpikeTrain::new(),
            trace: ObservableTrace::new(),
            rejected_events: 0,
        })
    }

    /// Handle for producers; clones share the same queue
    pub fn inbox(&self) -> EventInbox {
        self.inbox.clone()
    }

    pub fn neuron(&self) -> &N {
        &self.neuron
    }

    pub fn neuron_mut(&mut self) -> &mut N {
        &mut self.neuron
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn clock(&self) -> Step {
        self.clock
    }

    pub fn time_ms(&self) -> f64 {
        self.clock.to_ms(self.settings.resolution_ms)
    }

    pub fn spikes(&self) -> &SpikeTrain {
        &self.spikes
    }

    pub fn trace(&self) -> &ObservableTrace {
        &self.trace
    }

    /// Inbound events the neuron refused (unknown receptor, out of range)
    pub fn rejected_events(&self) -> usize {
        self.rejected_events
    }

    pub fn connect(&mut self, port: ReceptorPort) -> Result<ReceptorPort> {
        self.neuron.connect_receptor(port)
    }

    /// Merge a parameter update; the neuron is recalibrated before the next slice
    pub fn set_parameters(&mut self, update: &ParameterUpdate) -> Result<()> {
        self.neuron.set_parameters(update)
    }

    /// Inject `amplitude_pa` on every step from `start` on
    pub fn set_constant_current(&mut self, amplitude_pa: f64, start: Step) {
        self.dc = Some(DcSource {
            amplitude_pa,
            start,
        });
    }

    pub fn clear_constant_current(&mut self) {
        self.dc = None;
    }

    /// Run for `duration_ms`, rounded to whole steps
    pub fn run_ms(&mut self, duration_ms: f64) -> Result<()> {
        let steps = Step::from_ms(duration_ms, self.settings.resolution_ms).0;
        if steps < 0 {
            return Err(GlifError::InvalidSettings(format!(
                "duration must not be negative ({} ms)",
                duration_ms
            )));
        }
        self.run_steps(steps as usize)
    }

    pub fn run_steps(&mut self, steps: usize) -> Result<()> {
        if !self.neuron.is_calibrated() {
            self.neuron.calibrate(self.settings.resolution_ms)?;
        }
        let mut remaining = steps;
        while remaining > 0 {
            let len = remaining.min(self.settings.min_delay_steps);
            self.run_slice(len)?;
            remaining -= len;
        }
        Ok(())
    }

    fn run_slice(&mut self, len: usize) -> Result<()> {
        let origin = self.clock;
        self.neuron.begin_slice(origin);
        self.deliver(origin);

        if let Some(dc) = self.dc {
            for lag in 0..len {
                if origin.offset(lag) >= dc.start {
                    self.neuron
                        .handle_current(&CurrentEvent::new(lag, dc.amplitude_pa))?;
                }
            }
        }

        self.neuron
            .update(origin, 0, len, &mut self.spikes, &mut self.trace)?;
        self.clock = origin.offset(len);
        Ok(())
    }

    fn deliver(&mut self, origin: Step) {
        let window = self.settings.buffer_capacity();
        for event in self.inbox.drain_due(origin, window) {
            let offset = event.delivery().steps_since(origin) as usize;
            let outcome = match event {
                PendingEvent::Spike {
                    receptor,
                    weight,
                    multiplicity,
                    ..
                } => self.neuron.handle_spike(
                    &SpikeEvent::new(receptor, offset, weight).with_multiplicity(multiplicity),
                ),
                PendingEvent::Current {
                    weight, current, ..
                } => self
                    .neuron
                    .handle_current(&CurrentEvent::new(offset, current).with_weight(weight)),
            };
            if let Err(err) = outcome {
                self.rejected_events += 1;
                warn!(error = %err, delivery = event.delivery().0, "Rejected inbound event");
            }
        }
    }
}
