//! Waveform weighting and oscillator crossfade

use crate::gen::{PhaseOscillator, Signals};
use crate::params::{ParameterBank, Slot};

/// Peak output voltage of a combined oscillator signal
pub const OUTPUT_SCALE: f32 = 5.0;

/// Per-waveform amplitude weights for one oscillator (0.0 to 1.0 each)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveLevels {
    pub ramp: f32,
    pub pulse: f32,
    pub sub: f32,
}

impl WaveLevels {
    pub fn new(ramp: f32, pulse: f32, sub: f32) -> Self {
        Self { ramp, pulse, sub }
    }

    pub fn primary(bank: &ParameterBank) -> Self {
        Self::new(
            bank.slot(Slot::PrimaryRampLevel),
            bank.slot(Slot::PrimaryPulseLevel),
            bank.slot(Slot::PrimarySubLevel),
        )
    }

    pub fn secondary(bank: &ParameterBank) -> Self {
        Self::new(
            bank.slot(Slot::SecondaryRampLevel),
            bank.slot(Slot::SecondaryPulseLevel),
            bank.slot(Slot::SecondarySubLevel),
        )
    }
}

/// Read all three waveforms from an oscillator's current state
#[inline]
pub fn render_oscillator(osc: &PhaseOscillator, duty: f32, duty_offset: f32) -> Signals {
    Signals::new(osc.ramp(), osc.pulse(duty, duty_offset), osc.sub())
}

/// Weighted sum scaled to the output voltage range.
///
/// Dividing by 3 keeps the sum within +/-5 with every level at maximum.
#[inline]
pub fn combine(signals: Signals, levels: WaveLevels) -> f32 {
    OUTPUT_SCALE
        * (signals.ramp * levels.ramp + signals.pulse * levels.pulse + signals.sub * levels.sub)
        / 3.0
}

/// Linear crossfade: `mix` of -1 gives `a`, +1 gives `b`
#[inline]
pub fn crossfade(a: f32, b: f32, mix: f32) -> f32 {
    let b_weight = (1.0 + mix.clamp(-1.0, 1.0)) * 0.5;
    let a_weight = 1.0 - b_weight;
    a * a_weight + b * b_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_full_levels() {
        let signals = Signals::new(1.0, 1.0, 1.0);
        let levels = WaveLevels::new(1.0, 1.0, 1.0);
        assert_eq!(combine(signals, levels), 5.0);

        let signals = Signals::new(-1.0, -1.0, -1.0);
        assert_eq!(combine(signals, levels), -5.0);
    }

    #[test]
    fn test_combine_single_waveform() {
        let signals = Signals::new(0.6, -1.0, 1.0);
        let levels = WaveLevels::new(0.0, 1.0, 0.0);
        assert_eq!(combine(signals, levels), 5.0 * -1.0 / 3.0);
    }

    #[test]
    fn test_crossfade_endpoints_and_center() {
        assert_eq!(crossfade(2.0, 4.0, -1.0), 2.0);
        assert_eq!(crossfade(2.0, 4.0, 1.0), 4.0);
        assert_eq!(crossfade(2.0, 4.0, 0.0), 3.0);
        // Out of range mix saturates
        assert_eq!(crossfade(2.0, 4.0, 3.0), 4.0);
    }

    #[test]
    fn test_render_reads_current_phase() {
        let mut osc = PhaseOscillator::new(1.0);
        osc.advance(0.5); // phase -0.5

        let signals = render_oscillator(&osc, 0.5, 0.0);
        assert_eq!(signals, Signals::new(0.5, 1.0, 1.0));
    }
}
