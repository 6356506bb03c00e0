// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # GLIF - Generalized Leaky Integrate-and-Fire Neurons
//!
//! Point-neuron models integrated with exact (or forward Euler) propagators on
//! a fixed time grid, with alpha-shaped synaptic currents and precise spike
//! times.
//!
//! ## Quick Start
//!
//! ```rust
//! use glif::prelude::*;
//!
//! let neuron = create_model(GLIF_LIF, None).unwrap();
//! let mut sim = Simulation::new(neuron, SimulationSettings::default()).unwrap();
//! sim.set_constant_current(1500.0, Step::ZERO);
//! sim.run_ms(20.0).unwrap();
//! assert!(!sim.spikes().is_empty());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  glif (this crate): setup + glif_run binary   │
//! └───────────────────────────────────────────────┘
//!          ↓                ↓                ↓
//! ┌──────────────┐ ┌──────────────┐ ┌────────────────────┐
//! │ glif-neural  │ │ glif-config  │ │ glif-observability │
//! │ models, host │ │ TOML, env    │ │ tracing setup      │
//! └──────────────┘ └──────────────┘ └────────────────────┘
//! ```
//!
//! ## Feature Flags
//!
//! - **`file-logging`** (default): JSON log files per run
//!
//! ## License
//!
//! Apache-2.0

pub use glif_config as config;
pub use glif_neural as neural;
pub use glif_observability as observability;

pub mod setup;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::neural::{
        available_models, create_model, CurrentEvent, DynGlifModel, DynamicsMethod, GlifError,
        GlifLif, GlifLifPsc, GlifParameters, NeuronModel, ObservableTrace, ParameterUpdate,
        Phase, ReceptorPort, Simulation, SimulationSettings, SpikeEvent, SpikeTrain, Step,
        UnitSystem,
    };
    pub use crate::neural::models::{GLIF_LIF, GLIF_LIF_PSC};
    pub use crate::setup::{build_neuron, build_simulation, neuron_parameters, run, RunReport};
}
