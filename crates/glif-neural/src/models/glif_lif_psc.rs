// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # GLIF LIF Neuron with Alpha-Shaped Synaptic Currents
//!
//! Adds `N` current-based receptors to the plain LIF dynamics. Receptor `k`
//! (1-based) has its own time constant `τs[k-1]`; a spike of weight `w`
//! produces a current `w·(t/τs)·e^{1-t/τs}` that peaks at `w` pA.
//!
//! ```text
//! C dV/dt = -g (V - E_L) + I + Σ_k y2[k]
//! ```

use super::glif::{GlifNeuron, GlifVariant, I_INJECTED, I_SYN, V_M};
use super::parameters::GlifParameters;

/// Variant marker of the alpha-synapse GLIF neuron
#[derive(Debug, Clone, Copy, Default)]
pub struct LifPsc;

impl GlifVariant for LifPsc {
    const NAME: &'static str = "glif_lif_psc";
    const RECORDABLES: &'static [&'static str] = &[V_M, I_INJECTED, I_SYN];

    fn default_parameters() -> GlifParameters {
        GlifParameters::psc_defaults()
    }
}

/// GLIF neuron with alpha-shaped postsynaptic currents (`glif_lif_psc`)
pub type GlifLifPsc = GlifNeuron<LifPsc>;
