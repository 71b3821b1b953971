//! Passive two-port stamps: resistor, capacitor, inductor, voltmeter.

use num_complex::Complex;

use nodal_core::{ComplexMna, RealMna};

/// Floor on resistance so a zero-valued resistor stamps a finite admittance.
pub const MIN_RESISTANCE: f64 = 1e-6;

/// Admittance of a capacitor at the operating point (near-open).
pub const DC_OPEN_ADMITTANCE: f64 = 1e-12;

/// Admittance of an inductor at the operating point (near-short).
pub const DC_SHORT_ADMITTANCE: f64 = 1e6;

/// Admittance of a voltmeter in every regime (1 GΩ).
pub const VOLTMETER_ADMITTANCE: f64 = 1e-9;

/// A resistor between two nodes.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub id: String,
    pub pos: Option<usize>,
    pub neg: Option<usize>,
    pub resistance: f64,
}

impl Resistor {
    pub fn stamp_dc(&self, mna: &mut RealMna) {
        mna.stamp_conductance(self.pos, self.neg, 1.0 / self.resistance.max(MIN_RESISTANCE));
    }

    pub fn stamp_ac(&self, mna: &mut ComplexMna) {
        let y = Complex::new(1.0 / self.resistance, 0.0);
        mna.stamp_conductance(self.pos, self.neg, y);
    }

    /// Branch current from the solved node voltages.
    pub fn current(&self, v_pos: f64, v_neg: f64) -> f64 {
        (v_pos - v_neg) / self.resistance
    }
}

/// A capacitor between two nodes.
///
/// DC stamps a near-open admittance; AC the complex admittance `jωC`; the
/// transient companion model lives with the engine, which tracks the
/// capacitor voltage between steps.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub id: String,
    pub pos: Option<usize>,
    pub neg: Option<usize>,
    pub capacitance: f64,
}

impl Capacitor {
    pub fn stamp_dc(&self, mna: &mut RealMna) {
        mna.stamp_conductance(self.pos, self.neg, DC_OPEN_ADMITTANCE);
    }

    pub fn stamp_ac(&self, mna: &mut ComplexMna, omega: f64) {
        let y = Complex::new(0.0, omega * self.capacitance);
        mna.stamp_conductance(self.pos, self.neg, y);
    }
}

/// An inductor between two nodes.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub id: String,
    pub pos: Option<usize>,
    pub neg: Option<usize>,
    pub inductance: f64,
}

impl Inductor {
    pub fn stamp_dc(&self, mna: &mut RealMna) {
        mna.stamp_conductance(self.pos, self.neg, DC_SHORT_ADMITTANCE);
    }

    pub fn stamp_ac(&self, mna: &mut ComplexMna, omega: f64) {
        // 1/(jωL) = −j/(ωL)
        let y = Complex::new(0.0, -1.0 / (omega * self.inductance));
        mna.stamp_conductance(self.pos, self.neg, y);
    }
}

/// A voltmeter: a 1 GΩ resistance, so probing barely loads the circuit.
#[derive(Debug, Clone)]
pub struct Voltmeter {
    pub id: String,
    pub pos: Option<usize>,
    pub neg: Option<usize>,
}

impl Voltmeter {
    pub fn stamp(&self, mna: &mut RealMna) {
        mna.stamp_conductance(self.pos, self.neg, VOLTMETER_ADMITTANCE);
    }

    pub fn stamp_ac(&self, mna: &mut ComplexMna) {
        mna.stamp_conductance(self.pos, self.neg, Complex::new(VOLTMETER_ADMITTANCE, 0.0));
    }

    pub fn current(&self, v_pos: f64, v_neg: f64) -> f64 {
        (v_pos - v_neg) * VOLTMETER_ADMITTANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resistor_stamps_reciprocal_conductance() {
        let r = Resistor {
            id: "R1".into(),
            pos: Some(0),
            neg: Some(1),
            resistance: 100.0,
        };
        let mut mna = RealMna::new(2, 0);
        r.stamp_dc(&mut mna);
        assert_eq!(mna.matrix()[(0, 0)], 0.01);
        assert_eq!(mna.matrix()[(0, 1)], -0.01);
    }

    #[test]
    fn zero_ohm_resistor_is_floored() {
        let r = Resistor {
            id: "R1".into(),
            pos: Some(0),
            neg: None,
            resistance: 0.0,
        };
        let mut mna = RealMna::new(1, 0);
        r.stamp_dc(&mut mna);
        assert_eq!(mna.matrix()[(0, 0)], 1.0 / MIN_RESISTANCE);
    }

    #[test]
    fn capacitor_ac_admittance_is_imaginary() {
        let c = Capacitor {
            id: "C1".into(),
            pos: Some(0),
            neg: None,
            capacitance: 1e-6,
        };
        let mut mna = ComplexMna::new(1, 0);
        let omega = 2.0 * std::f64::consts::PI * 1000.0;
        c.stamp_ac(&mut mna, omega);
        let y = mna.matrix()[(0, 0)];
        assert_eq!(y.re, 0.0);
        assert!((y.im - omega * 1e-6).abs() < 1e-15);
    }

    #[test]
    fn inductor_ac_admittance_is_negative_imaginary() {
        let l = Inductor {
            id: "L1".into(),
            pos: Some(0),
            neg: None,
            inductance: 1e-3,
        };
        let mut mna = ComplexMna::new(1, 0);
        let omega = 2.0 * std::f64::consts::PI * 1000.0;
        l.stamp_ac(&mut mna, omega);
        let y = mna.matrix()[(0, 0)];
        assert_eq!(y.re, 0.0);
        assert!((y.im + 1.0 / (omega * 1e-3)).abs() < 1e-12);
    }
}
