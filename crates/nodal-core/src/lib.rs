//! Core circuit representation for Nodal.
//!
//! This crate provides:
//! - The circuit description consumed by the analysis engines: [`Component`],
//!   [`Wire`], and [`Circuit`] ([`circuit`] module)
//! - The electrical-node graph builder that unions wired ports into numbered
//!   nodes ([`graph`] module)
//! - Dense Modified Nodal Analysis matrix assembly, real and complex
//!   ([`mna`] module)
//! - Source waveform shapes for transient excitation ([`waveform`] module)

pub mod circuit;
pub mod graph;
pub mod mna;
pub mod waveform;

pub use circuit::{Circuit, Component, ComponentKind, PortRef, Wire};
pub use graph::{NodeId, NodeMap, build_node_map};
pub use mna::{ComplexMna, MnaSystem, RealMna};
pub use waveform::Waveform;

/// The analysis regime a system is being assembled for.
///
/// Several stamps differ between regimes (capacitor admittance, source
/// right-hand sides), and the set of extra MNA unknowns depends on it:
/// ammeters and logic gates contribute branch equations only at the
/// operating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// DC / interactive operating point.
    OperatingPoint,
    /// Small-signal frequency sweep.
    AcSweep,
    /// Time-domain integration.
    Transient,
}
