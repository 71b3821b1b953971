//! Elaboration: from circuit description to stamp-ready devices.
//!
//! Elaboration resolves every component's ports to MNA matrix indices and
//! assigns branch (extra-unknown) indices in a fixed order that the engines
//! rely on when harvesting currents:
//!
//! - operating point: voltage sources → ammeters → op-amps → logic gates
//! - AC sweep and transient: voltage sources → op-amps
//!
//! Ammeters, diodes, LEDs, and logic gates do not stamp outside the
//! operating point; their devices are still elaborated (with no branch) so
//! harvesting code can see them.

use std::collections::HashMap;

use nalgebra::DVector;

use nodal_core::{AnalysisMode, Circuit, Component, ComponentKind, ComplexMna, NodeMap, RealMna};

use crate::logic::{DEFAULT_LOGIC_HIGH, GateKind, LogicGate};
use crate::nonlinear::{DEFAULT_FORWARD_VOLTAGE, Diode};
use crate::opamp::{DEFAULT_GAIN, DEFAULT_INPUT_IMPEDANCE, OpAmp};
use crate::passive::{Capacitor, Inductor, Resistor, Voltmeter};
use crate::sources::{Ammeter, IndependentSource, SourceKind};

/// A stamp-ready device with resolved matrix indices.
#[derive(Debug, Clone)]
pub enum Device {
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
    Voltmeter(Voltmeter),
    Source(IndependentSource),
    Ammeter(Ammeter),
    Diode(Diode),
    OpAmp(OpAmp),
    Gate(LogicGate),
}

impl Device {
    pub fn id(&self) -> &str {
        match self {
            Device::Resistor(d) => &d.id,
            Device::Capacitor(d) => &d.id,
            Device::Inductor(d) => &d.id,
            Device::Voltmeter(d) => &d.id,
            Device::Source(d) => &d.id,
            Device::Ammeter(d) => &d.id,
            Device::Diode(d) => &d.id,
            Device::OpAmp(d) => &d.id,
            Device::Gate(d) => &d.id,
        }
    }

    /// Stamp for one DC fixed-point iteration. Nonlinear devices linearize
    /// against `iterate`.
    pub fn stamp_dc(&self, mna: &mut RealMna, iterate: &DVector<f64>) {
        match self {
            Device::Resistor(d) => d.stamp_dc(mna),
            Device::Capacitor(d) => d.stamp_dc(mna),
            Device::Inductor(d) => d.stamp_dc(mna),
            Device::Voltmeter(d) => d.stamp(mna),
            Device::Source(d) => d.stamp_dc(mna),
            Device::Ammeter(d) => d.stamp_dc(mna),
            Device::Diode(d) => d.stamp_dc(mna, iterate),
            Device::OpAmp(d) => d.stamp_dc(mna, iterate),
            Device::Gate(d) => d.stamp_dc(mna, d.evaluate(iterate)),
        }
    }

    /// Stamp for one AC frequency point. Ammeters, diodes, and gates are
    /// omitted from the small-signal picture.
    pub fn stamp_ac(&self, mna: &mut ComplexMna, omega: f64) {
        match self {
            Device::Resistor(d) => d.stamp_ac(mna),
            Device::Capacitor(d) => d.stamp_ac(mna, omega),
            Device::Inductor(d) => d.stamp_ac(mna, omega),
            Device::Voltmeter(d) => d.stamp_ac(mna),
            Device::Source(d) => d.stamp_ac(mna),
            Device::OpAmp(d) => d.stamp_linear(mna),
            Device::Ammeter(_) | Device::Diode(_) | Device::Gate(_) => {}
        }
    }

    /// Stamp the non-reactive part of a transient time step. Capacitors and
    /// inductors are covered by the engine's companion models.
    pub fn stamp_transient(&self, mna: &mut RealMna, t: f64) {
        match self {
            Device::Resistor(d) => d.stamp_dc(mna),
            Device::Voltmeter(d) => d.stamp(mna),
            Device::Source(d) => d.stamp_transient(mna, t),
            Device::OpAmp(d) => d.stamp_linear(mna),
            Device::Capacitor(_)
            | Device::Inductor(_)
            | Device::Ammeter(_)
            | Device::Diode(_)
            | Device::Gate(_) => {}
        }
    }
}

/// The elaborated circuit: devices plus branch bookkeeping.
#[derive(Debug, Clone)]
pub struct Elaboration {
    pub devices: Vec<Device>,
    /// Number of extra MNA unknowns in this regime.
    pub num_branches: usize,
    branch_of: HashMap<String, usize>,
}

impl Elaboration {
    /// Branch index of a component's extra unknown, if it has one in this
    /// regime.
    pub fn branch_of(&self, id: &str) -> Option<usize> {
        self.branch_of.get(id).copied()
    }
}

/// Resolve a circuit against its node map for the given analysis regime.
pub fn elaborate(circuit: &Circuit, nodes: &NodeMap, mode: AnalysisMode) -> Elaboration {
    let dc = mode == AnalysisMode::OperatingPoint;

    // Branch indices in the fixed harvest order.
    let mut branch_of: HashMap<String, usize> = HashMap::new();
    let mut next = 0usize;
    let mut assign = |branch_of: &mut HashMap<String, usize>, pred: fn(&Component) -> bool| {
        for component in circuit.components.iter().filter(|c| pred(c)) {
            branch_of.insert(component.id.clone(), next);
            next += 1;
        }
    };
    assign(&mut branch_of, |c| {
        matches!(
            c.kind,
            ComponentKind::VoltageSource | ComponentKind::AcSource
        )
    });
    if dc {
        assign(&mut branch_of, |c| c.kind == ComponentKind::Ammeter);
    }
    assign(&mut branch_of, |c| c.kind == ComponentKind::OpAmp);
    if dc {
        assign(&mut branch_of, |c| c.kind.is_logic_gate());
    }

    let index = |id: &str, port: usize| nodes.index_of(id, port);

    let mut devices = Vec::with_capacity(circuit.components.len());
    for component in &circuit.components {
        let id = component.id.clone();
        let device = match component.kind {
            ComponentKind::Ground => continue,
            ComponentKind::Resistor => Device::Resistor(Resistor {
                pos: index(&id, 0),
                neg: index(&id, 1),
                resistance: component.value,
                id,
            }),
            ComponentKind::Capacitor => Device::Capacitor(Capacitor {
                pos: index(&id, 0),
                neg: index(&id, 1),
                capacitance: component.value,
                id,
            }),
            ComponentKind::Inductor => Device::Inductor(Inductor {
                pos: index(&id, 0),
                neg: index(&id, 1),
                inductance: component.value,
                id,
            }),
            ComponentKind::Voltmeter => Device::Voltmeter(Voltmeter {
                pos: index(&id, 0),
                neg: index(&id, 1),
                id,
            }),
            ComponentKind::VoltageSource | ComponentKind::AcSource => {
                Device::Source(IndependentSource {
                    pos: index(&id, 0),
                    neg: index(&id, 1),
                    branch: branch_of[&id],
                    kind: if component.kind == ComponentKind::AcSource {
                        SourceKind::Ac
                    } else {
                        SourceKind::Dc
                    },
                    value: component.value,
                    dc_bias: component.dc_bias.unwrap_or(0.0),
                    frequency: component.frequency,
                    waveform: component.waveform.unwrap_or_default(),
                    duty_cycle: component.duty_cycle.unwrap_or(0.5),
                    id,
                })
            }
            ComponentKind::Ammeter => Device::Ammeter(Ammeter {
                pos: index(&id, 0),
                neg: index(&id, 1),
                branch: branch_of.get(&id).copied(),
                id,
            }),
            ComponentKind::Diode | ComponentKind::Led => Device::Diode(Diode {
                anode: index(&id, 0),
                cathode: index(&id, 1),
                forward_voltage: if component.value > 0.0 {
                    component.value
                } else {
                    DEFAULT_FORWARD_VOLTAGE
                },
                id,
            }),
            ComponentKind::OpAmp => Device::OpAmp(OpAmp {
                non_inv: index(&id, 0),
                inv: index(&id, 1),
                out: index(&id, 2),
                branch: branch_of[&id],
                gain: if component.value > 0.0 {
                    component.value
                } else {
                    DEFAULT_GAIN
                },
                input_impedance: component
                    .input_impedance
                    .filter(|&z| z > 0.0)
                    .unwrap_or(DEFAULT_INPUT_IMPEDANCE),
                id,
            }),
            kind if kind.is_logic_gate() => {
                let (gate_kind, input_count) = match kind {
                    ComponentKind::AndGate => (GateKind::And, component.input_count()),
                    ComponentKind::OrGate => (GateKind::Or, component.input_count()),
                    ComponentKind::NandGate => (GateKind::Nand, component.input_count()),
                    ComponentKind::NorGate => (GateKind::Nor, component.input_count()),
                    ComponentKind::XorGate => (GateKind::Xor, component.input_count()),
                    _ => (GateKind::Not, 1),
                };
                let inputs = (0..input_count).map(|p| index(&id, p)).collect();
                Device::Gate(LogicGate {
                    kind: gate_kind,
                    inputs,
                    output: index(&id, input_count),
                    branch: branch_of.get(&id).copied(),
                    logic_high: if component.value > 0.0 {
                        component.value
                    } else {
                        DEFAULT_LOGIC_HIGH
                    },
                    id,
                })
            }
            _ => unreachable!("all component kinds are handled above"),
        };
        devices.push(device);
    }

    Elaboration {
        devices,
        num_branches: next,
        branch_of,
    }
}
