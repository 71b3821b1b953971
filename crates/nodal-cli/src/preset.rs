//! Preset loading: the JSON circuit format produced by the schematic
//! editor.
//!
//! Layout fields (`position`, `rotation`, `label`) are accepted and
//! ignored; the core keys everything by component id. Host-boundary
//! normalization happens here: unknown waveform names decode as SINE and
//! out-of-range duty cycles are clamped into (0, 1).

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use nodal_core::{Circuit, Component, ComponentKind, PortRef, Waveform, Wire};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub components: Vec<PresetComponent>,
    #[serde(default)]
    pub wires: Vec<PresetWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: f64,
    pub frequency: Option<f64>,
    pub waveform: Option<String>,
    pub dc_bias: Option<f64>,
    pub duty_cycle: Option<f64>,
    pub input_impedance: Option<f64>,
    pub input_count: Option<usize>,
    pub max_current: Option<f64>,
    // Layout-only fields, ignored by the engines.
    #[serde(default)]
    pub position: Option<serde_json::Value>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetWire {
    #[serde(default)]
    pub id: Option<String>,
    pub from: PresetPort,
    pub to: PresetPort,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetPort {
    pub component_id: String,
    pub port_index: usize,
}

fn kind_from_name(name: &str) -> Option<ComponentKind> {
    Some(match name.to_ascii_uppercase().as_str() {
        "RESISTOR" => ComponentKind::Resistor,
        "CAPACITOR" => ComponentKind::Capacitor,
        "INDUCTOR" => ComponentKind::Inductor,
        "VOLTAGE_SOURCE" => ComponentKind::VoltageSource,
        "AC_SOURCE" => ComponentKind::AcSource,
        "DIODE" => ComponentKind::Diode,
        "LED" => ComponentKind::Led,
        "VOLTMETER" => ComponentKind::Voltmeter,
        "AMMETER" => ComponentKind::Ammeter,
        "GROUND" => ComponentKind::Ground,
        "OPAMP" => ComponentKind::OpAmp,
        "NOT_GATE" => ComponentKind::NotGate,
        "AND_GATE" => ComponentKind::AndGate,
        "OR_GATE" => ComponentKind::OrGate,
        "NAND_GATE" => ComponentKind::NandGate,
        "NOR_GATE" => ComponentKind::NorGate,
        "XOR_GATE" => ComponentKind::XorGate,
        _ => return None,
    })
}

/// Parse a preset JSON document into a circuit description.
pub fn parse(text: &str) -> Result<Circuit> {
    let preset: Preset = serde_json::from_str(text).context("malformed preset JSON")?;

    let mut components = Vec::with_capacity(preset.components.len());
    for entry in preset.components {
        let Some(kind) = kind_from_name(&entry.kind) else {
            bail!("component {}: unknown type {:?}", entry.id, entry.kind);
        };
        let mut component = Component::new(entry.id, kind, entry.value);
        component.frequency = entry.frequency;
        component.waveform = entry.waveform.as_deref().map(Waveform::from_name);
        component.dc_bias = entry.dc_bias;
        component.duty_cycle = entry.duty_cycle.map(|d| d.clamp(0.001, 0.999));
        component.input_impedance = entry.input_impedance;
        component.input_count = entry.input_count;
        component.max_current = entry.max_current;
        components.push(component);
    }

    let wires = preset
        .wires
        .into_iter()
        .map(|w| {
            Wire::new(
                PortRef::new(w.from.component_id, w.from.port_index),
                PortRef::new(w.to.component_id, w.to.port_index),
            )
        })
        .collect();

    Ok(Circuit::new(components, wires))
}
