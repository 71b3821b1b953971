//! Independent source and ammeter stamps.

use num_complex::Complex;

use nodal_core::{ComplexMna, RealMna, Waveform};

/// Fallback frequency for an AC source whose `frequency` attribute is unset.
pub const DEFAULT_FREQUENCY: f64 = 60.0;

/// Whether a source is a DC battery or a periodic AC source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Dc,
    Ac,
}

/// An independent voltage source, DC or AC, contributing one branch
/// equation.
///
/// The operating point uses the DC value (`value` for a DC source, `dc_bias`
/// for an AC source); the AC sweep drives only AC sources (DC sources appear
/// as shorts); the transient regime evaluates the source waveform at each
/// time step.
#[derive(Debug, Clone)]
pub struct IndependentSource {
    pub id: String,
    pub pos: Option<usize>,
    pub neg: Option<usize>,
    pub branch: usize,
    pub kind: SourceKind,
    /// DC value or AC amplitude, in volts.
    pub value: f64,
    pub dc_bias: f64,
    pub frequency: Option<f64>,
    pub waveform: Waveform,
    pub duty_cycle: f64,
}

impl IndependentSource {
    fn dc_value(&self) -> f64 {
        match self.kind {
            SourceKind::Dc => self.value,
            SourceKind::Ac => self.dc_bias,
        }
    }

    /// Instantaneous source voltage at time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        match self.kind {
            SourceKind::Dc => self.value,
            SourceKind::Ac => {
                let frequency = match self.frequency {
                    Some(f) if f > 0.0 => f,
                    _ => DEFAULT_FREQUENCY,
                };
                self.waveform
                    .value_at(t, self.value, frequency, self.dc_bias, self.duty_cycle)
            }
        }
    }

    pub fn stamp_dc(&self, mna: &mut RealMna) {
        mna.stamp_voltage_source(self.pos, self.neg, self.branch, self.dc_value());
    }

    pub fn stamp_ac(&self, mna: &mut ComplexMna) {
        let amplitude = match self.kind {
            SourceKind::Dc => 0.0, // shorted in the small-signal picture
            SourceKind::Ac => self.value,
        };
        mna.stamp_voltage_source(self.pos, self.neg, self.branch, Complex::new(amplitude, 0.0));
    }

    pub fn stamp_transient(&self, mna: &mut RealMna, t: f64) {
        mna.stamp_voltage_source(self.pos, self.neg, self.branch, self.value_at(t));
    }
}

/// An ammeter: a zero-volt source whose branch unknown is the measured
/// current. Contributes a branch equation only at the operating point.
#[derive(Debug, Clone)]
pub struct Ammeter {
    pub id: String,
    pub pos: Option<usize>,
    pub neg: Option<usize>,
    pub branch: Option<usize>,
}

impl Ammeter {
    pub fn stamp_dc(&self, mna: &mut RealMna) {
        if let Some(branch) = self.branch {
            mna.stamp_voltage_source(self.pos, self.neg, branch, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ac_source(waveform: Waveform) -> IndependentSource {
        IndependentSource {
            id: "V1".into(),
            pos: Some(0),
            neg: None,
            branch: 0,
            kind: SourceKind::Ac,
            value: 5.0,
            dc_bias: 1.0,
            frequency: Some(100.0),
            waveform,
            duty_cycle: 0.5,
        }
    }

    #[test]
    fn dc_source_is_constant_in_time() {
        let src = IndependentSource {
            id: "V1".into(),
            pos: Some(0),
            neg: None,
            branch: 0,
            kind: SourceKind::Dc,
            value: 10.0,
            dc_bias: 0.0,
            frequency: None,
            waveform: Waveform::Sine,
            duty_cycle: 0.5,
        };
        assert_eq!(src.value_at(0.0), 10.0);
        assert_eq!(src.value_at(1.0), 10.0);
    }

    #[test]
    fn ac_source_uses_bias_at_dc() {
        let src = ac_source(Waveform::Sine);
        let mut mna = RealMna::new(1, 1);
        src.stamp_dc(&mut mna);
        assert_eq!(mna.rhs()[1], 1.0);
    }

    #[test]
    fn dc_source_is_a_short_in_ac() {
        let src = IndependentSource {
            kind: SourceKind::Dc,
            ..ac_source(Waveform::Sine)
        };
        let mut mna = ComplexMna::new(1, 1);
        src.stamp_ac(&mut mna);
        assert_eq!(mna.rhs()[1], Complex::new(0.0, 0.0));
        // The branch row still couples the terminals.
        assert_eq!(mna.matrix()[(1, 0)], Complex::new(1.0, 0.0));
    }

    #[test]
    fn transient_value_follows_waveform() {
        let src = ac_source(Waveform::Square);
        // First half of the 10 ms period: +A + bias.
        assert_eq!(src.value_at(2e-3), 6.0);
        // Second half: −A + bias.
        assert_eq!(src.value_at(7e-3), -4.0);
    }

    #[test]
    fn missing_frequency_falls_back() {
        let src = IndependentSource {
            frequency: None,
            ..ac_source(Waveform::Sine)
        };
        // sin(2π·60·t) at t = 1/240 is a quarter period: the peak.
        let v = src.value_at(1.0 / 240.0);
        assert!((v - 6.0).abs() < 1e-9, "peak = {v} (expected 6.0)");
    }

    #[test]
    fn ammeter_without_branch_stamps_nothing() {
        let meter = Ammeter {
            id: "A1".into(),
            pos: Some(0),
            neg: Some(1),
            branch: None,
        };
        let mut mna = RealMna::new(2, 0);
        meter.stamp_dc(&mut mna);
        assert_eq!(mna.matrix()[(0, 0)], 0.0);
    }
}
