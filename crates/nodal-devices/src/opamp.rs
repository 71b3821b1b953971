//! Idealized op-amp stamps.
//!
//! The op-amp contributes one branch unknown: the current it injects into
//! its output node. Its branch equation enforces either the open-loop
//! relation `V(out) = gain · (V(+) − V(−))` or, when the DC iterate drives
//! the target past a supply rail, a pinned output at the rail. AC and
//! transient assembly always use the linear relation; a saturated op-amp in
//! those regimes can therefore report voltages beyond the rails. A small
//! admittance between the inputs models the differential input impedance.

use nalgebra::{ComplexField, DVector};
use num_traits::One;

use nodal_core::{MnaSystem, RealMna};

/// Supply rails: the DC output saturates at ±15 V.
pub const SUPPLY_RAIL: f64 = 15.0;

/// Open-loop gain used when the component value is unset or non-positive.
pub const DEFAULT_GAIN: f64 = 1e5;

/// Differential input impedance used when the attribute is unset.
pub const DEFAULT_INPUT_IMPEDANCE: f64 = 1e7;

#[derive(Debug, Clone)]
pub struct OpAmp {
    pub id: String,
    /// Non-inverting input.
    pub non_inv: Option<usize>,
    /// Inverting input.
    pub inv: Option<usize>,
    pub out: Option<usize>,
    pub branch: usize,
    pub gain: f64,
    pub input_impedance: f64,
}

impl OpAmp {
    fn input_admittance(&self) -> f64 {
        1.0 / self.input_impedance
    }

    /// Open-loop output target for the given iterate.
    pub fn target(&self, iterate: &DVector<f64>) -> f64 {
        let vp = self.non_inv.map(|i| iterate[i]).unwrap_or(0.0);
        let vm = self.inv.map(|i| iterate[i]).unwrap_or(0.0);
        self.gain * (vp - vm)
    }

    /// Stamp the linear relation; used directly by AC and transient
    /// assembly and by the unsaturated DC case.
    pub fn stamp_linear<T>(&self, mna: &mut MnaSystem<T>)
    where
        T: ComplexField<RealField = f64> + Copy,
    {
        mna.stamp_conductance(self.non_inv, self.inv, T::from_real(self.input_admittance()));

        let row = mna.branch_row(self.branch);
        if let Some(o) = self.out {
            // Branch unknown is the current injected into the output node.
            mna.add(o, row, T::one());
            mna.add(row, o, T::one());
        }
        // V(out) − gain·V(+) + gain·V(−) = 0
        if let Some(p) = self.non_inv {
            mna.add(row, p, -T::from_real(self.gain));
        }
        if let Some(m) = self.inv {
            mna.add(row, m, T::from_real(self.gain));
        }
    }

    /// Stamp for the DC iterate, pinning the output to a rail when the
    /// open-loop target exceeds it.
    pub fn stamp_dc(&self, mna: &mut RealMna, iterate: &DVector<f64>) {
        let target = self.target(iterate);
        if target.abs() <= SUPPLY_RAIL {
            self.stamp_linear(mna);
            return;
        }

        mna.stamp_conductance(self.non_inv, self.inv, self.input_admittance());
        let row = mna.branch_row(self.branch);
        if let Some(o) = self.out {
            mna.add(o, row, 1.0);
            mna.add(row, o, 1.0);
        }
        mna.add_rhs(row, target.clamp(-SUPPLY_RAIL, SUPPLY_RAIL));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opamp() -> OpAmp {
        OpAmp {
            id: "U1".into(),
            non_inv: Some(0),
            inv: Some(1),
            out: Some(2),
            branch: 0,
            gain: 1e5,
            input_impedance: DEFAULT_INPUT_IMPEDANCE,
        }
    }

    #[test]
    fn linear_row_encodes_open_loop_relation() {
        let op = opamp();
        let mut mna = RealMna::new(3, 1);
        let iterate = DVector::zeros(4);
        op.stamp_dc(&mut mna, &iterate);

        let m = mna.matrix();
        // Branch row: V(out) − A·V(+) + A·V(−) = 0
        assert_eq!(m[(3, 2)], 1.0);
        assert_eq!(m[(3, 0)], -1e5);
        assert_eq!(m[(3, 1)], 1e5);
        // Output column carries the injected current.
        assert_eq!(m[(2, 3)], 1.0);
        assert_eq!(mna.rhs()[3], 0.0);
    }

    #[test]
    fn input_impedance_bridges_the_inputs() {
        let op = opamp();
        let mut mna = RealMna::new(3, 1);
        op.stamp_linear(&mut mna);
        let y = 1.0 / DEFAULT_INPUT_IMPEDANCE;
        assert!((mna.matrix()[(0, 0)] - y).abs() < 1e-18);
        assert!((mna.matrix()[(0, 1)] + y).abs() < 1e-18);
    }

    #[test]
    fn saturated_target_pins_the_output() {
        let op = opamp();
        let mut mna = RealMna::new(3, 1);
        // V(+) = 1 V, V(−) = 0: target = 1e5 V, far past the rail.
        let iterate = DVector::from_vec(vec![1.0, 0.0, 0.0, 0.0]);
        op.stamp_dc(&mut mna, &iterate);

        let m = mna.matrix();
        assert_eq!(m[(3, 2)], 1.0);
        // No gain terms in the pinned row.
        assert_eq!(m[(3, 0)], 0.0);
        assert_eq!(m[(3, 1)], 0.0);
        assert_eq!(mna.rhs()[3], SUPPLY_RAIL);
    }

    #[test]
    fn negative_saturation_clamps_to_minus_rail() {
        let op = opamp();
        let mut mna = RealMna::new(3, 1);
        let iterate = DVector::from_vec(vec![0.0, 1.0, 0.0, 0.0]);
        op.stamp_dc(&mut mna, &iterate);
        assert_eq!(mna.rhs()[3], -SUPPLY_RAIL);
    }
}
