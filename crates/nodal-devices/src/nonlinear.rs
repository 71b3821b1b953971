//! Diode and LED stamps.
//!
//! The interactive engine linearizes each diode against the previous
//! iterate: a conducting diode becomes a 10 Ω resistance anchored at its
//! forward voltage, a blocked one a 1 GΩ leak. LEDs share the model with a
//! different default forward voltage supplied at elaboration time.

use nalgebra::DVector;

use nodal_core::RealMna;

/// Conductance of a forward-biased diode (10 Ω on-resistance).
pub const ON_CONDUCTANCE: f64 = 0.1;

/// Conductance of a reverse-biased diode.
pub const OFF_CONDUCTANCE: f64 = 1e-9;

/// Forward voltage used when the component value is unset or non-positive.
pub const DEFAULT_FORWARD_VOLTAGE: f64 = 0.7;

/// A diode or LED between anode and cathode.
#[derive(Debug, Clone)]
pub struct Diode {
    pub id: String,
    pub anode: Option<usize>,
    pub cathode: Option<usize>,
    pub forward_voltage: f64,
}

impl Diode {
    fn voltage_across(&self, iterate: &DVector<f64>) -> f64 {
        let va = self.anode.map(|i| iterate[i]).unwrap_or(0.0);
        let vk = self.cathode.map(|i| iterate[i]).unwrap_or(0.0);
        va - vk
    }

    /// True if the previous iterate put the diode past its forward knee.
    pub fn is_conducting(&self, iterate: &DVector<f64>) -> bool {
        self.voltage_across(iterate) > self.forward_voltage
    }

    /// Stamp the linearized companion for the current iterate.
    ///
    /// Conducting: `G_on` between the terminals plus an anchor current
    /// `G_on · v_fwd` into the anode row (out of the cathode row), so the
    /// solved drop settles just above `v_fwd`. Blocked: a leak conductance.
    pub fn stamp_dc(&self, mna: &mut RealMna, iterate: &DVector<f64>) {
        if self.is_conducting(iterate) {
            mna.stamp_conductance(self.anode, self.cathode, ON_CONDUCTANCE);
            mna.stamp_current_source(
                self.cathode,
                self.anode,
                ON_CONDUCTANCE * self.forward_voltage,
            );
        } else {
            mna.stamp_conductance(self.anode, self.cathode, OFF_CONDUCTANCE);
        }
    }

    /// Branch current implied by the solved voltages.
    pub fn current(&self, solution: &DVector<f64>) -> f64 {
        let vd = self.voltage_across(solution);
        if vd > self.forward_voltage {
            (vd - self.forward_voltage) * ON_CONDUCTANCE
        } else {
            vd * OFF_CONDUCTANCE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diode() -> Diode {
        Diode {
            id: "D1".into(),
            anode: Some(0),
            cathode: None,
            forward_voltage: 0.7,
        }
    }

    #[test]
    fn blocked_diode_stamps_leak() {
        let d = diode();
        let iterate = DVector::from_vec(vec![0.0]);
        let mut mna = RealMna::new(1, 0);
        d.stamp_dc(&mut mna, &iterate);
        assert_eq!(mna.matrix()[(0, 0)], OFF_CONDUCTANCE);
        assert_eq!(mna.rhs()[0], 0.0);
    }

    #[test]
    fn conducting_diode_stamps_companion() {
        let d = diode();
        let iterate = DVector::from_vec(vec![2.0]);
        let mut mna = RealMna::new(1, 0);
        d.stamp_dc(&mut mna, &iterate);
        assert_eq!(mna.matrix()[(0, 0)], ON_CONDUCTANCE);
        assert!((mna.rhs()[0] - ON_CONDUCTANCE * 0.7).abs() < 1e-15);
    }

    #[test]
    fn current_rule_matches_companion() {
        let d = diode();
        let solution = DVector::from_vec(vec![1.7]);
        // (1.7 − 0.7) · 0.1 = 0.1 A
        assert!((d.current(&solution) - 0.1).abs() < 1e-12);

        let blocked = DVector::from_vec(vec![0.3]);
        assert!(d.current(&blocked).abs() < 1e-9);
    }
}
