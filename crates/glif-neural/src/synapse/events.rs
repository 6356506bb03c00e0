// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Inbound events
//!
//! Both payloads carry a delivery offset: the number of steps from the
//! current slice origin at which the contribution becomes effective.

use serde::{Deserialize, Serialize};

use crate::types::ReceptorPort;

/// Weighted spike arriving on a receptor port
///
/// # Example
/// ```
/// use glif_neural::{ReceptorPort, SpikeEvent};
///
/// let event = SpikeEvent::new(ReceptorPort(1), 3, 2.5).with_multiplicity(2);
/// assert_eq!(event.amount(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeEvent {
    pub receptor: ReceptorPort,
    pub delivery_offset: usize,
    /// Peak alpha current per spike, pA
    pub weight: f64,
    pub multiplicity: u32,
}

impl SpikeEvent {
    pub fn new(receptor: ReceptorPort, delivery_offset: usize, weight: f64) -> Self {
        Self {
            receptor,
            delivery_offset,
            weight,
            multiplicity: 1,
        }
    }

    pub fn with_multiplicity(mut self, multiplicity: u32) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    /// Total weight deposited in the receptor buffer
    #[inline]
    pub fn amount(&self) -> f64 {
        self.weight * self.multiplicity as f64
    }
}

/// Injected current (pA), held constant for one step once delivered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentEvent {
    pub delivery_offset: usize,
    pub weight: f64,
    pub current: f64,
}

impl CurrentEvent {
    pub fn new(delivery_offset: usize, current: f64) -> Self {
        Self {
            delivery_offset,
            weight: 1.0,
            current,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[inline]
    pub fn amount(&self) -> f64 {
        self.weight * self.current
    }
}
