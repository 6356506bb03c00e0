// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synaptic input module
//!
//! Inbound event payloads and the per-receptor alpha current filter.

pub mod alpha;
pub mod events;

pub use alpha::AlphaSynapses;
pub use events::{CurrentEvent, SpikeEvent};
