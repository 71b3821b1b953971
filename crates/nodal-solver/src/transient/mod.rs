//! Transient (time-domain) engine.
//!
//! Backward-Euler integration over a fixed grid: at every step the engine
//! assembles a fresh real system from the static devices (sources evaluated
//! at the step time) plus the reactive companions, solves it, emits a plot
//! point, and advances the companion state. The grid is inclusive — step
//! `k` lands at `k·dt` and the run emits `⌈stop/dt⌉ + 1` points, the first
//! one integrated from the all-zero initial state.

pub mod companion;

use std::collections::BTreeMap;

use log::debug;
use nalgebra::DVector;

use nodal_core::{AnalysisMode, Circuit, RealMna, build_node_map};
use nodal_devices::{Device, elaborate};

use crate::error::Error;
use crate::linear::solve_real;
use crate::report::{AnalysisReport, PlotPoint, harvest_nodes};

pub use companion::{CapacitorState, InductorState};

/// Time-grid parameters.
#[derive(Debug, Clone)]
pub struct TransientConfig {
    /// Integration step in seconds.
    pub time_step: f64,
    /// End of the run in seconds.
    pub stop_time: f64,
}

/// Integrate the circuit through time and report per-node traces.
///
/// A circuit with no ground or no live nodes yields an empty plot rather
/// than an error.
pub fn solve_transient(circuit: &Circuit, config: &TransientConfig) -> AnalysisReport {
    let mode = AnalysisMode::Transient;
    let nodes = build_node_map(circuit);
    let mut report = AnalysisReport::empty(mode, 0.0);
    if !nodes.has_ground || nodes.num_nodes == 0 {
        return report;
    }

    let elab = elaborate(circuit, &nodes, mode);
    let h = config.time_step;
    let num_steps = (config.stop_time / h).ceil() as usize;
    debug!("transient: {} steps of {h} s", num_steps + 1);

    let mut caps: Vec<CapacitorState> = elab
        .devices
        .iter()
        .filter_map(|d| match d {
            Device::Capacitor(c) => Some(CapacitorState::new(c)),
            _ => None,
        })
        .collect();
    let mut inds: Vec<InductorState> = elab
        .devices
        .iter()
        .filter_map(|d| match d {
            Device::Inductor(l) => Some(InductorState::new(l)),
            _ => None,
        })
        .collect();

    let size = nodes.num_nodes + elab.num_branches;
    let mut solution = DVector::zeros(size);

    for step in 0..=num_steps {
        let t = step as f64 * h;

        let mut mna = RealMna::new(nodes.num_nodes, elab.num_branches);
        for device in &elab.devices {
            device.stamp_transient(&mut mna, t);
        }
        for cap in &caps {
            cap.stamp(&mut mna, h);
        }
        for ind in &inds {
            ind.stamp(&mut mna, h);
        }

        let solved = match solve_real(mna.matrix(), mna.rhs()) {
            Ok(solved) => solved,
            Err(e) => return AnalysisReport::failure(mode, 0.0, e.to_string()),
        };
        if solved.is_singular() {
            return AnalysisReport::failure(mode, 0.0, Error::SingularMatrix.to_string());
        }
        solution = solved.x;

        report.plot.push(PlotPoint {
            x: t,
            values: (0..nodes.num_nodes).map(|k| solution[k]).collect(),
        });

        for cap in &mut caps {
            let v = cap.voltage_from(&solution);
            cap.update(v, h);
        }
        for ind in &mut inds {
            let v = ind.voltage_from(&solution);
            ind.update(v, h);
        }
    }

    let (snapshots, node_voltages) = harvest_nodes(&nodes, &solution);
    report.nodes = snapshots;
    report.node_voltages = node_voltages;
    report.component_currents =
        harvest_final_currents(&elab, &caps, &inds, &solution, nodes.num_nodes);
    report
}

/// Currents at the final time step: branch unknowns for sources and
/// op-amps, Ohm's law for resistive elements, companion state for the
/// reactives. Devices absent from the transient regime are not reported.
fn harvest_final_currents(
    elab: &nodal_devices::Elaboration,
    caps: &[CapacitorState],
    inds: &[InductorState],
    solution: &DVector<f64>,
    num_nodes: usize,
) -> BTreeMap<String, f64> {
    let v = |idx: Option<usize>| idx.map(|i| solution[i]).unwrap_or(0.0);

    let mut currents = BTreeMap::new();
    for device in &elab.devices {
        let current = match device {
            Device::Resistor(r) => r.current(v(r.pos), v(r.neg)),
            Device::Voltmeter(m) => m.current(v(m.pos), v(m.neg)),
            Device::Source(s) => solution[num_nodes + s.branch],
            Device::OpAmp(o) => solution[num_nodes + o.branch],
            Device::Capacitor(c) => {
                match caps.iter().find(|s| s.id == c.id) {
                    Some(state) => state.i_prev,
                    None => continue,
                }
            }
            Device::Inductor(l) => {
                match inds.iter().find(|s| s.id == l.id) {
                    Some(state) => state.i_prev,
                    None => continue,
                }
            }
            Device::Ammeter(_) | Device::Diode(_) | Device::Gate(_) => continue,
        };
        currents.insert(device.id().to_string(), current);
    }
    currents
}
