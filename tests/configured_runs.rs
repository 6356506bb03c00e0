// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file to spike report

use std::collections::HashMap;
use std::fs;

use glif::config::load_config;
use glif::setup::{build_simulation, run};
use glif::prelude::*;
use tempfile::TempDir;

const SI_CONFIG: &str = r#"
[simulation]
resolution_ms = 0.1
duration_ms = 60.0

[neuron]
model = "glif_lif"
units = "si"
threshold = 0.0265
conductance = 4.6951e-9
leak_potential = -0.0774
capacitance = 9.9182e-11
refractory_duration = 1.0
reset_potential = 0.0
dynamics_method = "linear_exact"

[stimulus]
constant_current = 1.5e-9
"#;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("glif_configuration.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_si_file_matches_biophysical_setup() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SI_CONFIG);
    let config = load_config(Some(&path), None).unwrap();
    let from_file = run(&config).unwrap();
    assert!(from_file.spike_count > 0);

    let mut neuron = GlifLif::new();
    neuron
        .set_parameters(
            &ParameterUpdate::new()
                .threshold(26.5)
                .conductance(4.6951)
                .leak_potential(-77.4)
                .capacitance(99.182)
                .refractory_duration(1.0)
                .reset_potential(0.0)
                .dynamics_method("linear_exact"),
        )
        .unwrap();
    let mut sim = Simulation::new(neuron, SimulationSettings::default()).unwrap();
    sim.set_constant_current(1500.0, Step::ZERO);
    sim.run_ms(60.0).unwrap();

    let expected = sim.spikes().times_ms(0.1);
    assert_eq!(from_file.spike_times_ms.len(), expected.len());
    for (a, b) in from_file.spike_times_ms.iter().zip(&expected) {
        assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
    }
}

#[test]
fn test_cli_overrides_apply_before_build() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SI_CONFIG);
    let overrides = HashMap::from([
        ("model".to_string(), "glif_lif_psc".to_string()),
        ("constant_current".to_string(), "0".to_string()),
    ]);
    let mut config = load_config(Some(&path), Some(&overrides)).unwrap();
    config.neuron.synaptic_time_constants = Some(vec![2.0, 6.0]);

    let sim = build_simulation(&config).unwrap();
    assert_eq!(sim.neuron().model_name(), GLIF_LIF_PSC);
    assert_eq!(sim.neuron().receptor_count(), 2);

    let report = run(&config).unwrap();
    assert_eq!(report.spike_count, 0);
}

#[test]
fn test_invalid_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[simulation]\nresolution_ms = -0.1\n");
    assert!(load_config(Some(&path), None).is_err());

    let path = write_config(&dir, "[neuron\nmodel = ");
    assert!(load_config(Some(&path), None).is_err());
}

#[test]
fn test_report_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SI_CONFIG);
    let report = run(&load_config(Some(&path), None).unwrap()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["model"], "glif_lif");
    assert_eq!(
        json["spike_times_ms"].as_array().unwrap().len(),
        report.spike_count
    );
}
