// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unit systems accepted at the configuration boundary
//!
//! Models compute internally in biophysical units:
//!
//! | Quantity    | Unit |
//! |-------------|------|
//! | voltage     | mV   |
//! | conductance | nS   |
//! | capacitance | pF   |
//! | current     | pA   |
//! | time        | ms   |
//!
//! Values given in SI units are converted once, explicitly, before they reach a
//! model. Durations are milliseconds in both systems (the simulation clock unit).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::GlifError;

pub const MILLIVOLTS_PER_VOLT: f64 = 1.0e3;
pub const NANOSIEMENS_PER_SIEMENS: f64 = 1.0e9;
pub const PICOFARADS_PER_FARAD: f64 = 1.0e12;
pub const PICOAMPERES_PER_AMPERE: f64 = 1.0e12;

/// Unit system of externally supplied electrical quantities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// mV, nS, pF, pA (used as-is)
    #[default]
    Biophysical,
    /// V, S, F, A
    Si,
}

impl UnitSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Biophysical => "biophysical",
            UnitSystem::Si => "si",
        }
    }

    #[inline]
    pub fn voltage_to_mv(self, value: f64) -> f64 {
        match self {
            UnitSystem::Biophysical => value,
            UnitSystem::Si => value * MILLIVOLTS_PER_VOLT,
        }
    }

    #[inline]
    pub fn voltage_from_mv(self, value_mv: f64) -> f64 {
        match self {
            UnitSystem::Biophysical => value_mv,
            UnitSystem::Si => value_mv / MILLIVOLTS_PER_VOLT,
        }
    }

    #[inline]
    pub fn conductance_to_ns(self, value: f64) -> f64 {
        match self {
            UnitSystem::Biophysical => value,
            UnitSystem::Si => value * NANOSIEMENS_PER_SIEMENS,
        }
    }

    #[inline]
    pub fn capacitance_to_pf(self, value: f64) -> f64 {
        match self {
            UnitSystem::Biophysical => value,
            UnitSystem::Si => value * PICOFARADS_PER_FARAD,
        }
    }

    #[inline]
    pub fn current_to_pa(self, value: f64) -> f64 {
        match self {
            UnitSystem::Biophysical => value,
            UnitSystem::Si => value * PICOAMPERES_PER_AMPERE,
        }
    }
}

impl FromStr for UnitSystem {
    type Err = GlifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "biophysical" => Ok(UnitSystem::Biophysical),
            "si" => Ok(UnitSystem::Si),
            other => Err(GlifError::UnknownUnitSystem(other.to_string())),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
