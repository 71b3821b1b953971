//! Cross-analysis invariants: results reference only input components,
//! ground reads exactly zero, and solutions do not depend on input order.

use std::collections::HashSet;

use nodal_core::{Circuit, Component, ComponentKind, Wire, build_node_map};
use nodal_solver::{SweepConfig, TransientConfig, solve_ac_sweep, solve_circuit, solve_transient};

/// A circuit with a bit of everything: source, divider, diode, capacitor.
fn mixed_circuit() -> Circuit {
    Circuit::new(
        vec![
            Component::new("V1", ComponentKind::VoltageSource, 5.0),
            Component::new("R1", ComponentKind::Resistor, 1e3),
            Component::new("R2", ComponentKind::Resistor, 2.2e3),
            Component::new("D1", ComponentKind::Diode, 0.7),
            Component::new("C1", ComponentKind::Capacitor, 1e-6),
            Component::new("GND1", ComponentKind::Ground, 0.0),
        ],
        vec![
            Wire::between("V1", 0, "R1", 0),
            Wire::between("R1", 1, "R2", 0),
            Wire::between("R1", 1, "D1", 0),
            Wire::between("D1", 1, "C1", 0),
            Wire::between("C1", 1, "GND1", 0),
            Wire::between("R2", 1, "GND1", 0),
            Wire::between("V1", 1, "GND1", 0),
        ],
    )
}

/// The same circuit with components and wires listed in a different order.
fn mixed_circuit_shuffled() -> Circuit {
    let original = mixed_circuit();
    let mut components = original.components.clone();
    let mut wires = original.wires.clone();
    components.reverse();
    components.swap(1, 4);
    wires.reverse();
    wires.swap(0, 3);
    Circuit::new(components, wires)
}

#[test]
fn results_reference_only_input_components() {
    let circuit = mixed_circuit();
    let input_ids: HashSet<&str> = circuit.components.iter().map(|c| c.id.as_str()).collect();

    let report = solve_circuit(&circuit, 0.0);
    for snapshot in &report.nodes {
        for id in &snapshot.component_ids {
            assert!(input_ids.contains(id.as_str()), "unknown component {id}");
        }
    }
    for id in report.component_currents.keys() {
        assert!(input_ids.contains(id.as_str()), "unknown component {id}");
    }
}

#[test]
fn ground_node_reads_exactly_zero() {
    let report = solve_circuit(&mixed_circuit(), 0.0);
    assert_eq!(report.voltage(0), Some(0.0));
    let ground_snapshot = report.nodes.iter().find(|n| n.id == 0).unwrap();
    assert_eq!(ground_snapshot.voltage, 0.0);
}

#[test]
fn dc_solution_is_order_independent() {
    let a = mixed_circuit();
    let b = mixed_circuit_shuffled();
    let report_a = solve_circuit(&a, 0.0);
    let report_b = solve_circuit(&b, 0.0);

    // Node numbering may differ between orderings; compare voltages
    // through ports, which are stable identifiers.
    let nodes_a = build_node_map(&a);
    let nodes_b = build_node_map(&b);
    for component in &a.components {
        for port in 0..component.port_count() {
            let va = report_a
                .voltage(nodes_a.node_of(&component.id, port).unwrap().0)
                .unwrap();
            let vb = report_b
                .voltage(nodes_b.node_of(&component.id, port).unwrap().0)
                .unwrap();
            assert!(
                (va - vb).abs() < 1e-6,
                "{}.{port}: {va} vs {vb}",
                component.id
            );
        }
    }

    for (id, ia) in &report_a.component_currents {
        let ib = report_b.component_currents[id];
        assert!((ia - ib).abs() < 1e-6, "{id}: {ia} vs {ib}");
    }
}

#[test]
fn ac_sweep_is_order_independent() {
    let a = mixed_circuit();
    let b = mixed_circuit_shuffled();
    let config = SweepConfig {
        start_freq: 10.0,
        stop_freq: 1e4,
        points: 11,
    };
    let report_a = solve_ac_sweep(&a, &config);
    let report_b = solve_ac_sweep(&b, &config);

    let nodes_a = build_node_map(&a);
    let nodes_b = build_node_map(&b);
    // Compare the trace of the node behind C1's positive port.
    let trace_a = report_a.trace(nodes_a.node_of("C1", 0).unwrap().0);
    let trace_b = report_b.trace(nodes_b.node_of("C1", 0).unwrap().0);
    assert_eq!(trace_a.len(), trace_b.len());
    for ((xa, va), (xb, vb)) in trace_a.iter().zip(&trace_b) {
        assert!((xa - xb).abs() < 1e-12);
        assert!((va - vb).abs() < 1e-6, "at {xa} Hz: {va} vs {vb}");
    }
}

#[test]
fn transient_is_order_independent() {
    let a = mixed_circuit();
    let b = mixed_circuit_shuffled();
    let config = TransientConfig {
        time_step: 1e-4,
        stop_time: 2e-3,
    };
    let report_a = solve_transient(&a, &config);
    let report_b = solve_transient(&b, &config);

    let nodes_a = build_node_map(&a);
    let nodes_b = build_node_map(&b);
    let trace_a = report_a.trace(nodes_a.node_of("C1", 0).unwrap().0);
    let trace_b = report_b.trace(nodes_b.node_of("C1", 0).unwrap().0);
    for ((xa, va), (_, vb)) in trace_a.iter().zip(&trace_b) {
        assert!((va - vb).abs() < 1e-6, "at t = {xa}: {va} vs {vb}");
    }
}

#[test]
fn every_component_gets_a_dc_current_entry() {
    let circuit = mixed_circuit();
    let report = solve_circuit(&circuit, 0.0);
    for component in &circuit.components {
        if component.kind == ComponentKind::Ground {
            continue;
        }
        assert!(
            report.current(&component.id).is_some(),
            "missing current for {}",
            component.id
        );
    }
}
