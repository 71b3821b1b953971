//! Backward-Euler companion models for reactive elements.
//!
//! Over one time step a capacitor becomes `G_eq = C/h` in parallel with a
//! history current `G_eq · v_prev`, and an inductor `G_eq = h/L` with its
//! stored current as the history term. State lives here, between the
//! engine's steps — never on the circuit description.

use nalgebra::DVector;

use nodal_core::RealMna;
use nodal_devices::{Capacitor, Inductor};

/// Per-step state of a capacitor.
#[derive(Debug, Clone)]
pub struct CapacitorState {
    pub id: String,
    pub pos: Option<usize>,
    pub neg: Option<usize>,
    pub capacitance: f64,
    /// Voltage across the capacitor at the previous step.
    pub v_prev: f64,
    /// Current through the capacitor at the previous step.
    pub i_prev: f64,
}

impl CapacitorState {
    pub fn new(capacitor: &Capacitor) -> Self {
        Self {
            id: capacitor.id.clone(),
            pos: capacitor.pos,
            neg: capacitor.neg,
            capacitance: capacitor.capacitance,
            v_prev: 0.0,
            i_prev: 0.0,
        }
    }

    /// Stamp the companion: `G_eq` plus the history current into the
    /// positive terminal.
    pub fn stamp(&self, mna: &mut RealMna, h: f64) {
        let geq = self.capacitance / h;
        mna.stamp_conductance(self.pos, self.neg, geq);
        mna.stamp_current_source(self.neg, self.pos, geq * self.v_prev);
    }

    /// Voltage across the capacitor in a solution vector.
    pub fn voltage_from(&self, solution: &DVector<f64>) -> f64 {
        let vp = self.pos.map(|i| solution[i]).unwrap_or(0.0);
        let vn = self.neg.map(|i| solution[i]).unwrap_or(0.0);
        vp - vn
    }

    /// Advance the state after a solved step.
    pub fn update(&mut self, v_new: f64, h: f64) {
        self.i_prev = self.capacitance / h * (v_new - self.v_prev);
        self.v_prev = v_new;
    }
}

/// Per-step state of an inductor.
#[derive(Debug, Clone)]
pub struct InductorState {
    pub id: String,
    pub pos: Option<usize>,
    pub neg: Option<usize>,
    pub inductance: f64,
    /// Inductor current at the previous step, positive from `pos` to `neg`.
    pub i_prev: f64,
}

impl InductorState {
    pub fn new(inductor: &Inductor) -> Self {
        Self {
            id: inductor.id.clone(),
            pos: inductor.pos,
            neg: inductor.neg,
            inductance: inductor.inductance,
            i_prev: 0.0,
        }
    }

    /// Stamp the companion: `G_eq = h/L` plus the stored current flowing
    /// out of the positive terminal.
    pub fn stamp(&self, mna: &mut RealMna, h: f64) {
        let geq = h / self.inductance;
        mna.stamp_conductance(self.pos, self.neg, geq);
        mna.stamp_current_source(self.pos, self.neg, self.i_prev);
    }

    /// Voltage across the inductor in a solution vector.
    pub fn voltage_from(&self, solution: &DVector<f64>) -> f64 {
        let vp = self.pos.map(|i| solution[i]).unwrap_or(0.0);
        let vn = self.neg.map(|i| solution[i]).unwrap_or(0.0);
        vp - vn
    }

    /// Advance the stored current after a solved step.
    pub fn update(&mut self, v_new: f64, h: f64) {
        self.i_prev += h / self.inductance * v_new;
    }
}
