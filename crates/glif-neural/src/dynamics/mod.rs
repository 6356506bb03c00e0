// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neural Dynamics
//!
//! - **propagators**: closed-form coefficients compiled once per calibration
//! - **integrator**: per-step voltage update, threshold crossing and refractory hold

pub mod integrator;
pub mod propagators;

pub use integrator::{
    spike_offset, Phase, RefractoryClock, StepOutcome, VoltageIntegrator,
    REFRACTORY_TOLERANCE_MS,
};
pub use propagators::{AlphaPropagator, Coefficients, LeakPropagator};
