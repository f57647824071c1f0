//! Phase-accumulating oscillator
//!
//! A single phase state in [-1, 1) drives every waveform the voice needs: ramp,
//! duty-adjustable pulse, sub-octave square and (for the LFO) triangle. Waveforms are
//! naive and discontinuous; no bandlimiting is applied.

/// Phase accumulator shared by the Primary, Secondary and LFO oscillators
#[derive(Clone, Debug)]
pub struct PhaseOscillator {
    /// Current phase in [-1, 1)
    phase: f32,
    /// Reference frequency in Hz at pitch 0
    base_frequency: f32,
    /// Cached pitch in octaves relative to the base frequency
    pitch: f32,
    /// Cached `base_frequency * 2^pitch`
    frequency: f32,
    /// Flips on every wrap; selects the half of the sub-octave cycle
    cycle: bool,
}

impl PhaseOscillator {
    /// Create an oscillator at pitch 0 with its phase at the start of a cycle
    pub fn new(base_frequency: f32) -> Self {
        Self {
            phase: -1.0,
            base_frequency,
            pitch: 0.0,
            frequency: base_frequency,
            cycle: false,
        }
    }

    /// Advance the phase by one sample period.
    ///
    /// Returns `true` when the phase wrapped during this call. The overshoot past 1 is
    /// kept (2 is subtracted exactly once) so high frequencies stay phase-accurate.
    #[inline]
    pub fn advance(&mut self, sample_time: f32) -> bool {
        self.phase += self.frequency * sample_time;
        if self.phase >= 1.0 {
            self.phase -= 2.0;
            self.cycle = !self.cycle;
            true
        } else {
            false
        }
    }

    /// Hard reset to the start of a cycle (used by hard sync)
    #[inline]
    pub fn reset_phase(&mut self) {
        self.phase = -1.0;
        self.cycle = false;
    }

    /// Set the pitch in octaves. The exponential is only evaluated when the pitch
    /// actually changes.
    #[inline]
    pub fn update_pitch(&mut self, pitch: f32) {
        if pitch == self.pitch {
            return;
        }
        self.pitch = pitch;
        self.frequency = self.base_frequency * 2.0_f32.powf(pitch);
    }

    /// Falling ramp in [-1, 1)
    #[inline]
    pub fn ramp(&self) -> f32 {
        -self.phase
    }

    /// Symmetric triangle in [-1, 1], used by the LFO
    #[inline]
    pub fn triangle(&self) -> f32 {
        let position = self.phase + 1.0;
        let folded = if position > 1.0 { 2.0 - position } else { position };
        2.0 * folded - 1.0
    }

    /// Pulse wave: +1 while the normalized phase is within `duty`, -1 after it.
    ///
    /// `_offset` is accepted so pulse readers share one call shape, but it does not
    /// move the comparison point. Pulse-width modulation is expressed through `duty`.
    #[inline]
    pub fn pulse(&self, duty: f32, _offset: f32) -> f32 {
        let normalized = (self.phase + 1.0) * 0.5;
        if normalized > duty {
            -1.0
        } else {
            1.0
        }
    }

    /// Square wave one octave below the fundamental.
    ///
    /// Two consecutive cycles are laid end to end (the `cycle` flag picks which half of
    /// the span we are in) and the wave is high for the first cycle of the pair.
    #[inline]
    pub fn sub(&self) -> f32 {
        let span_position = (self.phase + 1.0) * 0.25 + if self.cycle { 0.5 } else { 0.0 };
        if span_position < 0.5 {
            1.0
        } else {
            -1.0
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn base_frequency(&self) -> f32 {
        self.base_frequency
    }

    pub fn cycle(&self) -> bool {
        self.cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_follows_pitch() {
        let mut osc = PhaseOscillator::new(261.6256);
        assert_eq!(osc.frequency(), 261.6256);

        osc.update_pitch(1.5);
        assert_eq!(osc.frequency(), 261.6256 * 2.0_f32.powf(1.5));

        // Second update with the same pitch leaves the frequency untouched
        let before = osc.frequency();
        osc.update_pitch(1.5);
        assert_eq!(osc.frequency(), before);
        assert_eq!(osc.pitch(), 1.5);
    }

    #[test]
    fn test_wrap_preserves_overshoot() {
        let mut osc = PhaseOscillator::new(1.0);

        // -1.0 -> -0.25 -> 0.5 -> 1.25 which wraps to -0.75
        assert!(!osc.advance(0.75));
        assert!(!osc.advance(0.75));
        assert!(osc.advance(0.75));
        assert_eq!(osc.phase(), -0.75);
        assert!(osc.cycle());
    }

    #[test]
    fn test_reset_phase() {
        let mut osc = PhaseOscillator::new(1.0);
        osc.advance(0.75);
        osc.advance(0.75);
        osc.advance(0.75);
        osc.reset_phase();

        assert_eq!(osc.phase(), -1.0);
        assert!(!osc.cycle());
    }

    #[test]
    fn test_ramp_and_triangle_shapes() {
        let mut osc = PhaseOscillator::new(1.0);
        assert_eq!(osc.ramp(), 1.0);
        assert_eq!(osc.triangle(), -1.0);

        osc.advance(0.5); // phase -0.5
        assert_eq!(osc.ramp(), 0.5);
        assert_eq!(osc.triangle(), 0.0);

        osc.advance(0.5); // phase 0.0
        assert_eq!(osc.triangle(), 1.0);

        osc.advance(0.5); // phase 0.5
        assert_eq!(osc.triangle(), 0.0);
        assert_eq!(osc.ramp(), -0.5);
    }

    #[test]
    fn test_pulse_duty_and_ignored_offset() {
        let mut osc = PhaseOscillator::new(1.0);
        osc.advance(0.5); // normalized phase 0.25

        assert_eq!(osc.pulse(0.5, 0.0), 1.0);
        assert_eq!(osc.pulse(0.2, 0.0), -1.0);
        assert_eq!(osc.pulse(0.5, 0.9), osc.pulse(0.5, 0.0));
        assert_eq!(osc.pulse(0.2, -0.7), osc.pulse(0.2, 0.0));
    }

    #[test]
    fn test_sub_runs_at_half_frequency() {
        let mut osc = PhaseOscillator::new(1.0);
        let sample_time = 1.0 / 64.0; // 128 samples per cycle

        let mut first_cycle = Vec::new();
        let mut second_cycle = Vec::new();
        for i in 0..256 {
            let target = if i < 128 { &mut first_cycle } else { &mut second_cycle };
            target.push(osc.sub());
            osc.advance(sample_time);
        }

        assert!(first_cycle.iter().all(|&s| s == 1.0));
        assert!(second_cycle.iter().all(|&s| s == -1.0));
        // Back to the high half after the second wrap
        assert_eq!(osc.sub(), 1.0);
    }
}
