// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for GLIF operations
//!
//! Every failure here is local and recoverable: the caller keeps the previous
//! valid configuration and may continue stepping.

/// Error types for GLIF operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GlifError {
    #[error("Invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("Unknown voltage dynamics method '{0}' (expected 'linear_forward_euler' or 'linear_exact')")]
    UnknownDynamicsMethod(String),

    #[error(
        "The neuron has connections, therefore the number of receptors cannot be reduced \
         (current: {current}, requested: {requested})"
    )]
    ReceptorCountLocked { current: usize, requested: usize },

    #[error("Receptor port {port} is not available on {model}: valid ports are 1..={receptor_count}")]
    InvalidReceptor {
        port: usize,
        receptor_count: usize,
        model: &'static str,
    },

    #[error("Delivery offset {offset} is outside the event buffer (capacity {capacity})")]
    DeliveryOutOfRange { offset: usize, capacity: usize },

    #[error("Cannot resize buffer bank from {current} to {requested} receptors while events are pending")]
    BufferNotEmpty { current: usize, requested: usize },

    #[error("{0} must be calibrated before it can be updated")]
    NotCalibrated(&'static str),

    #[error("Invalid lag range [{from}, {to})")]
    InvalidLagRange { from: usize, to: usize },

    #[error("Invalid resolution: {0} ms (must be finite and positive)")]
    InvalidResolution(f64),

    #[error("Unknown neuron model '{0}'")]
    UnknownModel(String),

    #[error("Unknown unit system '{0}' (expected 'biophysical' or 'si')")]
    UnknownUnitSystem(String),

    #[error("Invalid simulation settings: {0}")]
    InvalidSettings(String),
}

impl GlifError {
    pub(crate) fn invalid_parameter(key: impl Into<String>, reason: impl Into<String>) -> Self {
        GlifError::InvalidParameter {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, GlifError>;
pub type Error = GlifError;
