// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Delayed event buffers
//!
//! Weighted spikes and currents arrive ahead of time, tagged with the offset
//! (in steps) from the current slice origin at which they become effective.

pub mod ring_buffer;

pub use ring_buffer::{RingBuffer, RingBufferBank};
