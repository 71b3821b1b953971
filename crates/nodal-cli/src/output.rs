//! Report printing and JSON export.

use nodal_core::AnalysisMode;
use nodal_solver::AnalysisReport;
use serde_json::{Map, Value, json};

fn mode_name(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::OperatingPoint => "DC",
        AnalysisMode::AcSweep => "AC_SWEEP",
        AnalysisMode::Transient => "TRANSIENT",
    }
}

/// Print a human-readable summary to stdout.
pub fn print_report(report: &AnalysisReport) {
    println!("{} Analysis", mode_name(report.mode));
    println!("===========================");
    println!();

    if let Some(error) = &report.error {
        println!("Error: {error}");
        return;
    }

    if !report.nodes.is_empty() {
        println!("{:>8} {:>14}  {}", "Node", "Voltage (V)", "Components");
        for node in &report.nodes {
            println!(
                "{:>8} {:>14.6} {}",
                node.id,
                node.voltage,
                node.component_ids.join(", ")
            );
        }
        println!();
    }

    if !report.component_currents.is_empty() {
        println!("{:>8} {:>14}", "Element", "Current (A)");
        for (id, current) in &report.component_currents {
            println!("{id:>8} {current:>14.6e}");
        }
        println!();
    }

    if !report.plot.is_empty() {
        let x_label = match report.mode {
            AnalysisMode::AcSweep => "f (Hz)",
            _ => "t (s)",
        };
        let num_traces = report.plot[0].values.len();
        print!("{x_label:>14}");
        for n in 1..=num_traces {
            print!("{:>14}", format!("N{n}"));
        }
        println!();
        println!("{}", "-".repeat(14 * (num_traces + 1)));
        for point in &report.plot {
            print!("{:>14.6e}", point.x);
            for value in &point.values {
                print!("{value:>14.6}");
            }
            println!();
        }
        println!();
        println!("{} points.", report.plot.len());
    }

    if report.mode == AnalysisMode::OperatingPoint {
        let state = if report.converged {
            "converged"
        } else {
            "did not converge"
        };
        println!("{state} after {} iteration(s).", report.iterations);
    }
}

/// Render the report in the host-facing JSON shape: plot points carry one
/// `N<id>` key per node trace.
pub fn to_json(report: &AnalysisReport) -> Value {
    let plot: Vec<Value> = report
        .plot
        .iter()
        .map(|point| {
            let mut entry = Map::new();
            entry.insert("x".into(), json!(point.x));
            for (k, value) in point.values.iter().enumerate() {
                entry.insert(format!("N{}", k + 1), json!(value));
            }
            Value::Object(entry)
        })
        .collect();

    let node_voltages: Map<String, Value> = report
        .node_voltages
        .iter()
        .map(|(id, phasor)| {
            (
                id.to_string(),
                json!({"magnitude": phasor.magnitude, "phase": phasor.phase}),
            )
        })
        .collect();

    json!({
        "mode": mode_name(report.mode),
        "frequency": report.frequency,
        "error": report.error,
        "converged": report.converged,
        "iterations": report.iterations,
        "nodes": report.nodes.iter().map(|n| json!({
            "id": n.id,
            "voltage": n.voltage,
            "phase": n.phase,
            "componentIds": n.component_ids,
        })).collect::<Vec<_>>(),
        "nodeVoltages": node_voltages,
        "componentCurrents": report.component_currents,
        "plotData": plot,
    })
}
