// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # GLIF LIF Neuron Model
//!
//! Leaky integrate-and-fire driven by injected current only. There are no
//! synaptic receptors, so every spike binding is rejected.
//!
//! ```text
//! C dV/dt = -g (V - E_L) + I
//! V > θ  ─> spike, hold V for t_ref, then V = V_reset
//! ```

use super::glif::{GlifNeuron, GlifVariant, V_M};
use super::parameters::GlifParameters;
use crate::types::{GlifError, Result};

/// Variant marker of the current-only GLIF neuron
#[derive(Debug, Clone, Copy, Default)]
pub struct Lif;

impl GlifVariant for Lif {
    const NAME: &'static str = "glif_lif";
    const RECORDABLES: &'static [&'static str] = &[V_M];

    fn default_parameters() -> GlifParameters {
        GlifParameters::lif_defaults()
    }

    fn check(params: &GlifParameters) -> Result<()> {
        if params.receptor_count() > 0 {
            return Err(GlifError::invalid_parameter(
                "synaptic_time_constants",
                "glif_lif has no synaptic receptors",
            ));
        }
        Ok(())
    }
}

/// Current-driven GLIF neuron (`glif_lif`)
pub type GlifLif = GlifNeuron<Lif>;
