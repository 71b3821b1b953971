//! Nodal: the circuit simulation core of an interactive schematic editor.
//!
//! The host hands over an immutable [`Circuit`] (components plus
//! point-to-point wires) and gets back an [`AnalysisReport`] with node
//! voltages, per-component currents, and — for sweeps — plot traces.
//!
//! ```
//! use nodal::{Circuit, Component, ComponentKind, Wire, solve_circuit};
//!
//! let circuit = Circuit::new(
//!     vec![
//!         Component::new("V1", ComponentKind::VoltageSource, 10.0),
//!         Component::new("R1", ComponentKind::Resistor, 100.0),
//!         Component::new("GND1", ComponentKind::Ground, 0.0),
//!     ],
//!     vec![
//!         Wire::between("V1", 0, "R1", 0),
//!         Wire::between("R1", 1, "GND1", 0),
//!         Wire::between("V1", 1, "GND1", 0),
//!     ],
//! );
//!
//! let report = solve_circuit(&circuit, 0.0);
//! assert!(report.error.is_none());
//! assert!((report.current("R1").unwrap() - 0.1).abs() < 1e-9);
//! ```

pub use nodal_core::{
    AnalysisMode, Circuit, Component, ComponentKind, NodeId, NodeMap, PortRef, Waveform, Wire,
    build_node_map,
};
pub use nodal_solver::{
    AnalysisReport, NodeSnapshot, Phasor, PlotPoint, SweepConfig, TransientConfig, solve_ac_sweep,
    solve_circuit, solve_transient,
};

/// Device elaboration and stamp internals, re-exported for hosts that
/// assemble custom systems.
pub use nodal_devices as devices;
