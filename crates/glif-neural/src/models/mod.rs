// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron Model Architecture
//!
//! GLIF variants share one implementation ([`GlifNeuron`]) and differ only
//! through a [`GlifVariant`] marker.
//!
//! ## Adding a New Variant
//!
//! 1. Create `src/models/your_variant.rs` with a marker implementing `GlifVariant`
//! 2. Add a type alias `GlifNeuron<YourMarker>`
//! 3. Register the name in `registry.rs`
//! 4. Add tests
//!
//! Variants with extra state (adaptive threshold, after-spike currents)
//! implement `NeuronModel` directly.

pub mod glif;
pub mod glif_lif;
pub mod glif_lif_psc;
pub mod parameters;
pub mod registry;
pub mod traits;

// Re-export core types
pub use glif::{GlifNeuron, GlifVariant, I_INJECTED, I_SYN, V_M};
pub use glif_lif::{GlifLif, Lif};
pub use glif_lif_psc::{GlifLifPsc, LifPsc};
pub use parameters::{DynamicsMethod, GlifParameters, ParameterUpdate};
pub use registry::{
    available_models, create_model, default_parameters, DynGlifModel, GLIF_LIF, GLIF_LIF_PSC,
};
pub use traits::{ModelParameters, NeuronModel};
