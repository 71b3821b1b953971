//! DC / interactive operating-point engine.
//!
//! A fixed-point iteration: each pass re-linearizes the nonlinear devices
//! (diodes, op-amp clamping, logic-gate targets) against the previous
//! iterate, assembles a fresh system, and solves it. The loop settles when
//! no node voltage moves more than [`CONVERGENCE_TOLERANCE`], and is capped
//! at [`MAX_ITERATIONS`] — the last iterate is returned either way, with
//! the `converged` flag telling them apart.

use std::collections::BTreeMap;

use log::{debug, warn};
use nalgebra::DVector;

use nodal_core::{AnalysisMode, Circuit, RealMna, build_node_map};
use nodal_devices::passive::{DC_OPEN_ADMITTANCE, DC_SHORT_ADMITTANCE};
use nodal_devices::{Device, Elaboration, elaborate};

use crate::error::Error;
use crate::linear::solve_real;
use crate::report::{AnalysisReport, harvest_nodes};

/// Cap on fixed-point iterations.
pub const MAX_ITERATIONS: usize = 20;

/// Largest node-voltage delta (in volts) considered settled.
pub const CONVERGENCE_TOLERANCE: f64 = 0.01;

/// Compute the DC operating point of a circuit.
///
/// `frequency` is the host's bias frequency; it is echoed into the report
/// and does not influence the solve (AC sources contribute their DC bias
/// only).
pub fn solve_circuit(circuit: &Circuit, frequency: f64) -> AnalysisReport {
    let mode = AnalysisMode::OperatingPoint;
    let nodes = build_node_map(circuit);
    if !nodes.has_ground {
        return AnalysisReport::failure(mode, frequency, Error::NoGround.to_string());
    }

    let elab = elaborate(circuit, &nodes, mode);
    let size = nodes.num_nodes + elab.num_branches;

    let mut iterate = DVector::zeros(size);
    let mut iterations = 0;
    let mut converged = false;

    for iteration in 0..MAX_ITERATIONS {
        let mut mna = RealMna::new(nodes.num_nodes, elab.num_branches);
        for device in &elab.devices {
            device.stamp_dc(&mut mna, &iterate);
        }

        let solution = match solve_real(mna.matrix(), mna.rhs()) {
            Ok(solution) => solution,
            Err(e) => return AnalysisReport::failure(mode, frequency, e.to_string()),
        };
        if solution.is_singular() {
            return AnalysisReport::failure(mode, frequency, Error::SingularMatrix.to_string());
        }

        let max_diff = (0..nodes.num_nodes)
            .map(|i| (solution.x[i] - iterate[i]).abs())
            .fold(0.0_f64, f64::max);

        iterate = solution.x;
        iterations = iteration + 1;

        if max_diff < CONVERGENCE_TOLERANCE {
            converged = true;
            debug!("operating point settled after {iterations} iterations");
            break;
        }
    }

    if !converged {
        warn!("operating point hit the {MAX_ITERATIONS}-iteration cap without settling");
    }

    let (snapshots, node_voltages) = harvest_nodes(&nodes, &iterate);
    let component_currents = harvest_currents(&elab, &iterate, nodes.num_nodes);

    AnalysisReport {
        mode,
        nodes: snapshots,
        node_voltages,
        component_currents,
        plot: Vec::new(),
        frequency,
        error: None,
        iterations,
        converged,
    }
}

/// Derive per-component currents from the solved vector: branch unknowns
/// for elements that carry one, Ohm's law over the stamped admittance for
/// the passives.
fn harvest_currents(
    elab: &Elaboration,
    solution: &DVector<f64>,
    num_nodes: usize,
) -> BTreeMap<String, f64> {
    let v = |idx: Option<usize>| idx.map(|i| solution[i]).unwrap_or(0.0);
    let branch = |b: usize| solution[num_nodes + b];

    let mut currents = BTreeMap::new();
    for device in &elab.devices {
        let current = match device {
            Device::Resistor(r) => r.current(v(r.pos), v(r.neg)),
            Device::Voltmeter(m) => m.current(v(m.pos), v(m.neg)),
            Device::Capacitor(c) => (v(c.pos) - v(c.neg)) * DC_OPEN_ADMITTANCE,
            Device::Inductor(l) => (v(l.pos) - v(l.neg)) * DC_SHORT_ADMITTANCE,
            Device::Diode(d) => d.current(solution),
            Device::Source(s) => branch(s.branch),
            Device::OpAmp(o) => branch(o.branch),
            Device::Ammeter(a) => a.branch.map(branch).unwrap_or(0.0),
            Device::Gate(g) => g.branch.map(branch).unwrap_or(0.0),
        };
        currents.insert(device.id().to_string(), current);
    }
    currents
}
