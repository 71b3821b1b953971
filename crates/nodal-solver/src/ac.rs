//! AC small-signal sweep engine.
//!
//! Assembles and solves the complex MNA system at a logarithmically spaced
//! set of frequencies, emitting per-node magnitude traces. Nonlinear
//! devices, ammeters, and logic gates are absent from the small-signal
//! picture; DC sources appear as shorts.

use std::f64::consts::PI;

use log::debug;

use nodal_core::{AnalysisMode, Circuit, ComplexMna, build_node_map};
use nodal_devices::elaborate;

use crate::error::Error;
use crate::linear::solve_complex;
use crate::report::{AnalysisReport, PlotPoint};

/// Frequency-sweep parameters.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Start frequency in Hz; floored to 1 Hz for the log grid.
    pub start_freq: f64,
    /// Stop frequency in Hz.
    pub stop_freq: f64,
    /// Number of frequency points.
    pub points: usize,
}

/// Sweep the circuit over frequency and report magnitude traces.
///
/// A circuit with no ground or no live nodes yields an empty plot rather
/// than an error.
pub fn solve_ac_sweep(circuit: &Circuit, config: &SweepConfig) -> AnalysisReport {
    let mode = AnalysisMode::AcSweep;
    let nodes = build_node_map(circuit);
    let mut report = AnalysisReport::empty(mode, config.start_freq);
    if !nodes.has_ground || nodes.num_nodes == 0 {
        return report;
    }

    let elab = elaborate(circuit, &nodes, mode);

    let log_start = config.start_freq.max(1.0).log10();
    let log_stop = config.stop_freq.log10();
    let step = if config.points > 1 {
        (log_stop - log_start) / (config.points - 1) as f64
    } else {
        0.0
    };
    debug!(
        "AC sweep: {} points over 10^{log_start:.3}..10^{log_stop:.3} Hz",
        config.points
    );

    for i in 0..config.points {
        let freq = 10f64.powf(log_start + step * i as f64);
        let omega = 2.0 * PI * freq;

        let mut mna = ComplexMna::new(nodes.num_nodes, elab.num_branches);
        for device in &elab.devices {
            device.stamp_ac(&mut mna, omega);
        }

        let solution = match solve_complex(mna.matrix(), mna.rhs()) {
            Ok(solution) => solution,
            Err(e) => return AnalysisReport::failure(mode, config.start_freq, e.to_string()),
        };
        if solution.is_singular() {
            return AnalysisReport::failure(
                mode,
                config.start_freq,
                Error::SingularMatrix.to_string(),
            );
        }

        report.plot.push(PlotPoint {
            x: freq,
            values: (0..nodes.num_nodes).map(|k| solution.x[k].norm()).collect(),
        });
    }

    report
}
