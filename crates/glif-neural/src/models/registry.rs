// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Model lookup by name

use super::glif::GlifVariant;
use super::glif_lif::{GlifLif, Lif};
use super::glif_lif_psc::{GlifLifPsc, LifPsc};
use super::parameters::GlifParameters;
use super::traits::NeuronModel;
use crate::types::{GlifError, Result};

pub const GLIF_LIF: &str = Lif::NAME;
pub const GLIF_LIF_PSC: &str = LifPsc::NAME;

/// Boxed GLIF neuron of any registered variant
pub type DynGlifModel = Box<dyn NeuronModel<Parameters = GlifParameters>>;

pub fn available_models() -> &'static [&'static str] {
    &[GLIF_LIF, GLIF_LIF_PSC]
}

pub fn default_parameters(model: &str) -> Result<GlifParameters> {
    match model {
        GLIF_LIF => Ok(Lif::default_parameters()),
        GLIF_LIF_PSC => Ok(LifPsc::default_parameters()),
        other => Err(GlifError::UnknownModel(other.to_string())),
    }
}

/// Instantiate `model`, optionally with a full parameter set
pub fn create_model(model: &str, params: Option<GlifParameters>) -> Result<DynGlifModel> {
    let neuron: DynGlifModel = match (model, params) {
        (GLIF_LIF, None) => Box::new(GlifLif::new()),
        (GLIF_LIF, Some(p)) => Box::new(GlifLif::with_parameters(p)?),
        (GLIF_LIF_PSC, None) => Box::new(GlifLifPsc::new()),
        (GLIF_LIF_PSC, Some(p)) => Box::new(GlifLifPsc::with_parameters(p)?),
        (other, _) => return Err(GlifError::UnknownModel(other.to_string())),
    };
    Ok(neuron)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_by_name() {
        for &name in available_models() {
            let model = create_model(name, None).unwrap();
            assert_eq!(model.model_name(), name);
            assert_eq!(model.parameters(), &default_parameters(name).unwrap());
        }
    }

    #[test]
    fn test_unknown_model() {
        assert_eq!(
            create_model("iaf_psc_alpha", None).err().unwrap(),
            GlifError::UnknownModel("iaf_psc_alpha".into())
        );
        assert!(default_parameters("").is_err());
    }

    #[test]
    fn test_create_validates_parameters() {
        let mut params = GlifParameters::psc_defaults();
        params.synaptic_time_constants = vec![1.0, 3.0];
        let model = create_model(GLIF_LIF_PSC, Some(params.clone())).unwrap();
        assert_eq!(model.receptor_count(), 2);

        // Receptors are not allowed on the plain variant
        assert!(create_model(GLIF_LIF, Some(params)).is_err());

        let mut bad = GlifParameters::lif_defaults();
        bad.conductance = -1.0;
        assert!(create_model(GLIF_LIF, Some(bad)).is_err());
    }
}
