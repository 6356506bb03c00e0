// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neural Types Module
//!
//! Core type definitions shared by the buffers, the integrator and the models.

pub mod error;
pub mod fire;
pub mod ids;
pub mod units;

// Re-export commonly used types
pub use error::{Error, GlifError, Result};
pub use fire::{SpikeNotice, SpikeTrain};
pub use ids::{ReceptorPort, Step};
pub use units::UnitSystem;
