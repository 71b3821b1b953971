//! Circuit description: components, ports, and wires.
//!
//! The host (a schematic editor) supplies a [`Circuit`] as a flat list of
//! components plus point-to-point wires between ports. The description is
//! immutable for the duration of a solve; edits belong to the host and
//! trigger a fresh solve.

use crate::waveform::Waveform;

/// The component kinds understood by the analysis engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    VoltageSource,
    AcSource,
    Diode,
    Led,
    Voltmeter,
    Ammeter,
    Ground,
    OpAmp,
    NotGate,
    AndGate,
    OrGate,
    NandGate,
    NorGate,
    XorGate,
}

impl ComponentKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resistor => "Resistor",
            Self::Capacitor => "Capacitor",
            Self::Inductor => "Inductor",
            Self::VoltageSource => "Voltage Source",
            Self::AcSource => "AC Source",
            Self::Diode => "Diode",
            Self::Led => "LED",
            Self::Voltmeter => "Voltmeter",
            Self::Ammeter => "Ammeter",
            Self::Ground => "Ground",
            Self::OpAmp => "Op-Amp",
            Self::NotGate => "NOT Gate",
            Self::AndGate => "AND Gate",
            Self::OrGate => "OR Gate",
            Self::NandGate => "NAND Gate",
            Self::NorGate => "NOR Gate",
            Self::XorGate => "XOR Gate",
        }
    }

    /// Gates with a configurable number of input ports followed by one
    /// output port.
    pub fn is_multi_input_gate(&self) -> bool {
        matches!(
            self,
            Self::AndGate | Self::OrGate | Self::NandGate | Self::NorGate | Self::XorGate
        )
    }

    /// Any combinational logic gate, including the two-port NOT gate.
    pub fn is_logic_gate(&self) -> bool {
        self.is_multi_input_gate() || matches!(self, Self::NotGate)
    }
}

/// A single schematic component.
///
/// `value` is the primary parameter and its meaning depends on the kind:
/// resistance in ohms, capacitance in farads, inductance in henries, source
/// voltage in volts, open-loop gain for op-amps, forward voltage for diodes
/// and LEDs, logic-high voltage for gates. The remaining attributes apply
/// only to specific kinds and default when absent.
///
/// Port numbering conventions:
/// - Two-port components: port 0 is the positive terminal (anode for
///   diodes, input for NOT gates), port 1 the negative (output for NOT).
/// - Ground: single port 0.
/// - Op-amp: 0 = non-inverting input, 1 = inverting input, 2 = output.
/// - Multi-input gates: ports `0..input_count` are inputs, port
///   `input_count` is the output.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    pub value: f64,
    /// Source frequency in Hz (AC sources).
    pub frequency: Option<f64>,
    /// Transient excitation shape (AC sources).
    pub waveform: Option<Waveform>,
    /// DC offset added to the source waveform, and the operating-point
    /// contribution of an AC source.
    pub dc_bias: Option<f64>,
    /// Fraction of the period spent high, in (0, 1) (square/pulse shapes).
    pub duty_cycle: Option<f64>,
    /// Differential input impedance in ohms (op-amps).
    pub input_impedance: Option<f64>,
    /// Number of input ports (multi-input gates, at least 2).
    pub input_count: Option<usize>,
    /// Rated current in amperes (LEDs); informational only.
    pub max_current: Option<f64>,
}

impl Component {
    /// Create a component with the given primary value and all optional
    /// attributes unset.
    pub fn new(id: impl Into<String>, kind: ComponentKind, value: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            value,
            frequency: None,
            waveform: None,
            dc_bias: None,
            duty_cycle: None,
            input_impedance: None,
            input_count: None,
            max_current: None,
        }
    }

    /// Number of gate input ports, clamped to at least 2.
    pub fn input_count(&self) -> usize {
        self.input_count.unwrap_or(2).max(2)
    }

    /// Number of ports this component exposes.
    pub fn port_count(&self) -> usize {
        match self.kind {
            ComponentKind::Ground => 1,
            ComponentKind::OpAmp => 3,
            k if k.is_multi_input_gate() => self.input_count() + 1,
            _ => 2,
        }
    }
}

/// A component terminal, addressed as `(component id, port index)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub component: String,
    pub port: usize,
}

impl PortRef {
    pub fn new(component: impl Into<String>, port: usize) -> Self {
        Self {
            component: component.into(),
            port,
        }
    }
}

/// A wire connecting exactly two ports. Connectivity is symmetric; the
/// endpoint order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    pub from: PortRef,
    pub to: PortRef,
}

impl Wire {
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self { from, to }
    }

    /// Convenience constructor from raw ids and port indices.
    pub fn between(
        from: impl Into<String>,
        from_port: usize,
        to: impl Into<String>,
        to_port: usize,
    ) -> Self {
        Self {
            from: PortRef::new(from, from_port),
            to: PortRef::new(to, to_port),
        }
    }
}

/// The immutable circuit description handed to an engine entry point.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    pub components: Vec<Component>,
    pub wires: Vec<Wire>,
}

impl Circuit {
    pub fn new(components: Vec<Component>, wires: Vec<Wire>) -> Self {
        Self { components, wires }
    }

    /// Look up a component by id.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// True if at least one ground component is present.
    pub fn has_ground(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.kind == ComponentKind::Ground)
    }
}
