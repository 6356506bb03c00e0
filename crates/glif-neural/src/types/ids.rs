// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Identity types for simulation steps and receptor ports

use core::fmt;

use serde::{Deserialize, Serialize};

/// Absolute simulation step (multiples of the resolution since time zero)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Step(pub i64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Step `lag` steps after this one
    #[inline]
    pub fn offset(self, lag: usize) -> Step {
        Step(self.0 + lag as i64)
    }

    /// Signed distance in steps from `origin` to this step
    #[inline]
    pub fn steps_since(self, origin: Step) -> i64 {
        self.0 - origin.0
    }

    /// Time at the end of this step in milliseconds
    #[inline]
    pub fn to_ms(self, resolution_ms: f64) -> f64 {
        self.0 as f64 * resolution_ms
    }

    /// Nearest step for a time in milliseconds
    #[inline]
    pub fn from_ms(time_ms: f64, resolution_ms: f64) -> Step {
        Step((time_ms / resolution_ms).round() as i64)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step({})", self.0)
    }
}

/// Receptor port as seen by incoming connections (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceptorPort(pub usize);

impl ReceptorPort {
    /// Zero-based index into per-receptor state
    #[inline]
    pub fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for ReceptorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Receptor({})", self.0)
    }
}
