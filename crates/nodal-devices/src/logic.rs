//! Combinational logic gate stamps.
//!
//! Gates are modeled as ideal voltage sources at their output, forced to
//! either 0 or the gate's logic-high voltage by a threshold rule over the
//! input node voltages of the current iterate. They contribute a branch
//! equation only at the operating point; AC and transient assembly skip
//! them entirely.

use nalgebra::DVector;

use nodal_core::RealMna;

/// Logic-high output used when the component value is unset or
/// non-positive.
pub const DEFAULT_LOGIC_HIGH: f64 = 5.0;

/// Tiny conductance added to each input diagonal so a node driven only by
/// gate inputs still pivots.
pub const INPUT_CONDITIONING: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Not,
}

#[derive(Debug, Clone)]
pub struct LogicGate {
    pub id: String,
    pub kind: GateKind,
    pub inputs: Vec<Option<usize>>,
    pub output: Option<usize>,
    /// Branch index at the operating point; `None` in other regimes.
    pub branch: Option<usize>,
    pub logic_high: f64,
}

impl LogicGate {
    /// Evaluate the Boolean rule against the iterate, using a threshold of
    /// half the logic-high voltage. Returns the forced output voltage.
    pub fn evaluate(&self, iterate: &DVector<f64>) -> f64 {
        let threshold = self.logic_high / 2.0;
        let is_high = |input: Option<usize>| -> bool {
            input.map(|i| iterate[i]).unwrap_or(0.0) > threshold
        };

        let on = match self.kind {
            GateKind::And => self.inputs.iter().all(|i| is_high(*i)),
            GateKind::Or => self.inputs.iter().any(|i| is_high(*i)),
            GateKind::Nand => !self.inputs.iter().all(|i| is_high(*i)),
            GateKind::Nor => !self.inputs.iter().any(|i| is_high(*i)),
            GateKind::Xor => self.inputs.iter().filter(|i| is_high(**i)).count() % 2 == 1,
            GateKind::Not => !is_high(self.inputs.first().copied().flatten()),
        };

        if on { self.logic_high } else { 0.0 }
    }

    /// Stamp the forced-output row for the given target voltage.
    pub fn stamp_dc(&self, mna: &mut RealMna, target: f64) {
        let Some(branch) = self.branch else {
            return;
        };
        let row = mna.branch_row(branch);
        if let Some(o) = self.output {
            mna.add(o, row, 1.0);
            mna.add(row, o, 1.0);
        }
        mna.add_rhs(row, target);

        for input in self.inputs.iter().flatten() {
            mna.add(*input, *input, INPUT_CONDITIONING);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(kind: GateKind, inputs: Vec<Option<usize>>) -> LogicGate {
        LogicGate {
            id: "U1".into(),
            kind,
            inputs,
            output: Some(2),
            branch: Some(0),
            logic_high: 5.0,
        }
    }

    fn iterate(v0: f64, v1: f64) -> DVector<f64> {
        DVector::from_vec(vec![v0, v1, 0.0, 0.0])
    }

    #[test]
    fn and_requires_every_input_high() {
        let g = gate(GateKind::And, vec![Some(0), Some(1)]);
        assert_eq!(g.evaluate(&iterate(5.0, 5.0)), 5.0);
        assert_eq!(g.evaluate(&iterate(5.0, 0.0)), 0.0);
        assert_eq!(g.evaluate(&iterate(0.0, 0.0)), 0.0);
    }

    #[test]
    fn or_needs_any_input_high() {
        let g = gate(GateKind::Or, vec![Some(0), Some(1)]);
        assert_eq!(g.evaluate(&iterate(0.0, 5.0)), 5.0);
        assert_eq!(g.evaluate(&iterate(0.0, 0.0)), 0.0);
    }

    #[test]
    fn nand_nor_negate() {
        let nand = gate(GateKind::Nand, vec![Some(0), Some(1)]);
        assert_eq!(nand.evaluate(&iterate(5.0, 5.0)), 0.0);
        assert_eq!(nand.evaluate(&iterate(5.0, 0.0)), 5.0);

        let nor = gate(GateKind::Nor, vec![Some(0), Some(1)]);
        assert_eq!(nor.evaluate(&iterate(0.0, 0.0)), 5.0);
        assert_eq!(nor.evaluate(&iterate(0.0, 5.0)), 0.0);
    }

    #[test]
    fn xor_counts_odd_highs() {
        let g = gate(GateKind::Xor, vec![Some(0), Some(1)]);
        assert_eq!(g.evaluate(&iterate(5.0, 0.0)), 5.0);
        assert_eq!(g.evaluate(&iterate(5.0, 5.0)), 0.0);
    }

    #[test]
    fn not_inverts_its_single_input() {
        let g = gate(GateKind::Not, vec![Some(0)]);
        assert_eq!(g.evaluate(&iterate(0.0, 0.0)), 5.0);
        assert_eq!(g.evaluate(&iterate(5.0, 0.0)), 0.0);
    }

    #[test]
    fn threshold_is_half_logic_high() {
        let g = gate(GateKind::Or, vec![Some(0), Some(1)]);
        assert_eq!(g.evaluate(&iterate(2.4, 0.0)), 0.0);
        assert_eq!(g.evaluate(&iterate(2.6, 0.0)), 5.0);
    }

    #[test]
    fn stamp_forces_output_and_conditions_inputs() {
        let g = gate(GateKind::And, vec![Some(0), Some(1)]);
        let mut mna = RealMna::new(3, 1);
        g.stamp_dc(&mut mna, 5.0);

        assert_eq!(mna.matrix()[(2, 3)], 1.0);
        assert_eq!(mna.matrix()[(3, 2)], 1.0);
        assert_eq!(mna.rhs()[3], 5.0);
        assert_eq!(mna.matrix()[(0, 0)], INPUT_CONDITIONING);
        assert_eq!(mna.matrix()[(1, 1)], INPUT_CONDITIONING);
    }

    #[test]
    fn grounded_input_counts_as_low() {
        let g = gate(GateKind::Nor, vec![None, Some(0)]);
        assert_eq!(g.evaluate(&iterate(0.0, 0.0)), 5.0);
    }
}
