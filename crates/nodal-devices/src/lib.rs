//! Device models and MNA stamps for Nodal.
//!
//! This crate turns a circuit description plus its node map into a list of
//! stamp-ready devices with resolved matrix indices ([`elaborate`]), and
//! provides the per-kind stamp routines for the DC, AC, and transient
//! regimes:
//! - Passive admittances: R, C, L, voltmeter ([`passive`])
//! - Independent sources and ammeters ([`sources`])
//! - Diodes and LEDs as linearized companions ([`nonlinear`])
//! - Op-amps with DC rail clamping ([`opamp`])
//! - Combinational logic gates as forced outputs ([`logic`])

pub mod elaborate;
pub mod logic;
pub mod nonlinear;
pub mod opamp;
pub mod passive;
pub mod sources;

pub use elaborate::{Device, Elaboration, elaborate};
pub use logic::{GateKind, LogicGate};
pub use nonlinear::Diode;
pub use opamp::OpAmp;
pub use passive::{Capacitor, Inductor, Resistor, Voltmeter};
pub use sources::{Ammeter, IndependentSource, SourceKind};
