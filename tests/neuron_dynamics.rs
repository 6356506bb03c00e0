// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end dynamics through the `Simulation` host

use glif::prelude::*;

fn settings(resolution_ms: f64) -> SimulationSettings {
    SimulationSettings {
        resolution_ms,
        min_delay_steps: 10,
        max_delay_steps: 20,
    }
}

fn exact_lif(resolution_ms: f64) -> Simulation<GlifLif> {
    let mut neuron = GlifLif::new();
    neuron
        .set_parameters(&ParameterUpdate::new().dynamics_method("linear_exact"))
        .unwrap();
    Simulation::new(neuron, settings(resolution_ms)).unwrap()
}

#[test]
fn test_exact_steady_state_independent_of_step_size() {
    let current_pa = 100.0;
    for resolution_ms in [0.05, 0.1, 0.25] {
        let mut sim = exact_lif(resolution_ms);
        let params = sim.neuron().parameters().clone();
        sim.neuron_mut()
            .set_membrane_voltage(params.leak_potential)
            .unwrap();
        sim.set_constant_current(current_pa, Step::ZERO);
        sim.run_ms(500.0).unwrap();

        let expected = params.leak_potential + current_pa / params.conductance;
        assert!(expected < params.threshold);
        assert!(sim.spikes().is_empty());
        assert!(
            (sim.neuron().membrane_voltage() - expected).abs() < 1e-6,
            "h = {}: {} vs {}",
            resolution_ms,
            sim.neuron().membrane_voltage(),
            expected
        );
    }
}

#[test]
fn test_refractory_hold_then_reset() {
    let mut sim = exact_lif(0.1);
    sim.set_constant_current(1500.0, Step::ZERO);
    sim.run_steps(200).unwrap();

    let h = sim.settings().resolution_ms;
    let reset = sim.neuron().parameters().reset_potential;
    let v = sim.trace().values("V_m");
    assert_eq!(v.len(), 200);
    assert!(sim.spikes().len() >= 2);

    for spike in sim.spikes().iter() {
        // Voltage recorded on the crossing step is held for t_ref = 1.0 ms
        let crossing = (spike.step.0 - 1) as usize;
        if crossing + 10 >= v.len() {
            continue;
        }
        assert!(v[crossing] > sim.neuron().parameters().threshold);
        for held in crossing + 1..crossing + 10 {
            assert_eq!(v[held], v[crossing], "step {}", held);
        }
        assert_eq!(v[crossing + 10], reset);

        assert!((0.0..=h).contains(&spike.offset_ms));
        let t = spike.precise_time_ms(h);
        assert!(t >= crossing as f64 * h - 1e-12 && t <= (crossing + 1) as f64 * h + 1e-12);
    }
}

#[test]
fn test_si_scenario_one_spike_per_cycle() {
    let units = UnitSystem::Si;
    let params = GlifParameters::lif_defaults()
        .merged(
            &ParameterUpdate::new()
                .threshold(units.voltage_to_mv(0.0265))
                .conductance(units.conductance_to_ns(4.6951e-9))
                .leak_potential(units.voltage_to_mv(-0.0774))
                .capacitance(units.capacitance_to_pf(9.9182e-11))
                .refractory_duration(1.0)
                .reset_potential(units.voltage_to_mv(0.0))
                .dynamics_method("linear_exact"),
        )
        .unwrap();
    assert_eq!(params.dynamics_method, DynamicsMethod::LinearExact);
    let neuron = GlifLif::with_parameters(params).unwrap();
    let mut sim = Simulation::new(neuron, settings(0.1)).unwrap();
    sim.set_constant_current(units.current_to_pa(1.5e-9), Step::ZERO);
    sim.run_ms(100.0).unwrap();

    let steps = sim.spikes().steps();
    assert!(!steps.is_empty());
    assert!(steps[0].0 <= 50, "first spike at {}", steps[0]);
    // Hold (10 steps) plus the climb back from reset separate consecutive spikes
    for pair in steps.windows(2) {
        assert!(pair[1].0 - pair[0].0 > 10);
    }

    let v = sim.trace().values("V_m");
    let crossing = (steps[0].0 - 1) as usize;
    let held = v[crossing..crossing + 10]
        .iter()
        .filter(|&&x| x == v[crossing])
        .count();
    assert_eq!(held, 10);
    assert_eq!(v[crossing + 10], 0.0);
}

#[test]
fn test_alpha_current_peaks_at_unit_weight() {
    let mut sim = Simulation::new(GlifLifPsc::new(), settings(0.1)).unwrap();
    sim.connect(ReceptorPort(1)).unwrap();
    sim.inbox().push_spike(Step::ZERO, ReceptorPort(1), 1.0);
    sim.run_steps(40).unwrap();

    let i_syn = sim.trace().values("I_syn");
    let (peak_step, peak) = i_syn
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, x)| if x > best.1 { (i, x) } else { best });
    // τs = 2 ms at h = 0.1 ms
    assert_eq!(peak_step, 20);
    assert!((peak - 1.0).abs() < 1e-9);
    assert_eq!(sim.rejected_events(), 0);
}

#[test]
fn test_receptor_count_locked_once_connected() {
    let mut sim = Simulation::new(GlifLifPsc::new(), settings(0.1)).unwrap();
    sim.set_parameters(&ParameterUpdate::new().synaptic_time_constants(vec![2.0, 4.0, 8.0]))
        .unwrap();
    sim.connect(ReceptorPort(3)).unwrap();

    // Growing is fine, shrinking is not
    sim.set_parameters(
        &ParameterUpdate::new().synaptic_time_constants(vec![2.0, 4.0, 8.0, 16.0]),
    )
    .unwrap();
    assert_eq!(
        sim.set_parameters(&ParameterUpdate::new().synaptic_time_constants(vec![2.0]))
            .unwrap_err(),
        GlifError::ReceptorCountLocked {
            current: 4,
            requested: 1
        }
    );
    assert_eq!(sim.neuron().receptor_count(), 4);
    sim.run_steps(10).unwrap();
}

#[test]
fn test_unknown_receptor_events_are_counted_not_applied() {
    let mut sim = Simulation::new(GlifLifPsc::new(), settings(0.1)).unwrap();
    let inbox = sim.inbox();
    inbox.push_spike(Step(2), ReceptorPort(2), 50.0);
    inbox.push_spike(Step(3), ReceptorPort(1), 50.0);
    sim.run_steps(10).unwrap();

    assert_eq!(sim.rejected_events(), 1);
    let i_syn = sim.trace().values("I_syn");
    assert_eq!(i_syn[3], 0.0);
    assert!(i_syn[4] > 0.0);
    assert!(inbox.is_empty());
}

#[test]
fn test_inbox_accepts_events_from_other_threads() {
    let mut sim = Simulation::new(GlifLifPsc::new(), settings(0.1)).unwrap();
    sim.connect(ReceptorPort(1)).unwrap();

    let producers: Vec<_> = (0..4)
        .map(|i| {
            let inbox = sim.inbox();
            std::thread::spawn(move || inbox.push_spike(Step(i), ReceptorPort(1), 10.0))
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    assert_eq!(sim.inbox().len(), 4);

    sim.run_steps(30).unwrap();
    assert!(sim.inbox().is_empty());
    assert_eq!(sim.rejected_events(), 0);
    assert!(sim.neuron().synapses().total_current() > 0.0);
}
