// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # GLIF Neural Computation
//!
//! Single-compartment generalized leaky integrate-and-fire neurons, all in one place:
//! - **Types**: Steps, receptor ports, unit conversion, spike notices, errors
//! - **Buffer**: Delayed event buffers keyed by delivery offset
//! - **Dynamics**: Propagator compilation and the voltage integrator
//! - **Synapse**: Inbound events and the alpha-shaped current filter
//! - **Models**: `glif_lif` and `glif_lif_psc` behind the `NeuronModel` trait
//! - **Simulation**: A minimal slice-based host for driving one neuron
//!
//! ## Update order (one lag)
//!
//! ```text
//! refractory?  ── yes ──> count down, hold V (or reset at exit)
//!      │ no
//!      ▼
//! V ← leak step (forward Euler | exact) + Σ P31·y1 + P32·y2
//! V > θ  ──> spike at step+1 with interpolated offset, enter refractory
//!      ▼
//! y2 ← P21·y1 + P22·y2 ; y1 ← P11·y1 + e/τ · spikes(lag)
//! I  ← currents(lag)          (effective next step)
//! record V_m
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core type definitions
pub mod types;

// Delayed event buffers
pub mod buffer;

// Propagators and the voltage integrator
pub mod dynamics;

// Inbound events and alpha synapses
pub mod synapse;

// Host hooks (spike sink, observable channel)
pub mod hooks;

// Neuron models
pub mod models;

// Slice-based host
pub mod simulation;

// Re-export types
pub use types::{
    Error, GlifError, ReceptorPort, Result, SpikeNotice, SpikeTrain, Step, UnitSystem,
};

pub use buffer::{RingBuffer, RingBufferBank};
pub use dynamics::{
    spike_offset, AlphaPropagator, Coefficients, LeakPropagator, Phase, RefractoryClock,
    StepOutcome, VoltageIntegrator,
};
pub use hooks::{NullObservables, ObservableChannel, ObservableTrace, SpikeSink};
pub use synapse::{AlphaSynapses, CurrentEvent, SpikeEvent};

// Re-export neuron models
pub use models::{
    available_models, create_model, DynGlifModel, DynamicsMethod, GlifLif, GlifLifPsc, GlifNeuron,
    GlifParameters, GlifVariant, ModelParameters, NeuronModel, ParameterUpdate,
};

pub use simulation::{EventInbox, PendingEvent, Simulation, SimulationSettings};
