//! Analysis report types shared by the three engines.

use std::collections::BTreeMap;

use nalgebra::DVector;

use nodal_core::{AnalysisMode, NodeMap};

/// A node voltage as magnitude and phase. DC and transient results carry a
/// phase of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phasor {
    pub magnitude: f64,
    pub phase: f64,
}

impl Phasor {
    pub fn real(magnitude: f64) -> Self {
        Self {
            magnitude,
            phase: 0.0,
        }
    }
}

/// Per-node snapshot: the solved voltage plus every component touching the
/// node. Ground (node 0) is included and reads exactly 0 V.
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    pub id: usize,
    pub voltage: f64,
    pub phase: f64,
    pub component_ids: Vec<String>,
}

/// One sample of a sweep or transient trace. `x` is frequency in hertz or
/// time in seconds; `values[k]` is the trace of node `k + 1`.
#[derive(Debug, Clone)]
pub struct PlotPoint {
    pub x: f64,
    pub values: Vec<f64>,
}

/// The result object every engine entry point returns.
///
/// Always well-formed: failures set `error` and leave the data fields
/// empty rather than propagating.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub mode: AnalysisMode,
    pub nodes: Vec<NodeSnapshot>,
    pub node_voltages: BTreeMap<usize, Phasor>,
    pub component_currents: BTreeMap<String, f64>,
    pub plot: Vec<PlotPoint>,
    /// DC bias frequency (0) or sweep start frequency.
    pub frequency: f64,
    pub error: Option<String>,
    /// Fixed-point iterations spent (operating point only).
    pub iterations: usize,
    /// False when the operating point hit its iteration cap still moving.
    pub converged: bool,
}

impl AnalysisReport {
    /// An empty, successful report.
    pub fn empty(mode: AnalysisMode, frequency: f64) -> Self {
        Self {
            mode,
            nodes: Vec::new(),
            node_voltages: BTreeMap::new(),
            component_currents: BTreeMap::new(),
            plot: Vec::new(),
            frequency,
            error: None,
            iterations: 0,
            converged: true,
        }
    }

    /// A failure report with only the diagnostic set.
    pub fn failure(mode: AnalysisMode, frequency: f64, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::empty(mode, frequency)
        }
    }

    /// The trace of a node across the plot, as `(x, value)` pairs.
    pub fn trace(&self, node: usize) -> Vec<(f64, f64)> {
        assert!(node >= 1, "node 0 is ground");
        self.plot
            .iter()
            .filter_map(|p| p.values.get(node - 1).map(|&v| (p.x, v)))
            .collect()
    }

    /// Voltage snapshot of a node, if present.
    pub fn voltage(&self, node: usize) -> Option<f64> {
        self.node_voltages.get(&node).map(|p| p.magnitude)
    }

    /// Current through a component, if harvested.
    pub fn current(&self, id: &str) -> Option<f64> {
        self.component_currents.get(id).copied()
    }
}

/// Build the per-node snapshots and voltage map from a solution vector.
///
/// Inverts the port→node mapping to list, for every node, the components
/// touching it (in port enumeration order, deduplicated).
pub fn harvest_nodes(
    nodes: &NodeMap,
    solution: &DVector<f64>,
) -> (Vec<NodeSnapshot>, BTreeMap<usize, Phasor>) {
    let mut members: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (port, node) in nodes.ports() {
        let ids = members.entry(node.0).or_default();
        if !ids.contains(&port.component) {
            ids.push(port.component.clone());
        }
    }

    let mut snapshots = Vec::with_capacity(members.len());
    let mut voltages = BTreeMap::new();
    for (id, component_ids) in members {
        let voltage = match id {
            0 => 0.0,
            n => solution[n - 1],
        };
        voltages.insert(id, Phasor::real(voltage));
        snapshots.push(NodeSnapshot {
            id,
            voltage,
            phase: 0.0,
            component_ids,
        });
    }
    (snapshots, voltages)
}
