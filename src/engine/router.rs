//! Per-mode modulation routing
//!
//! Turns the parameter bank and the CV inputs into the pitch and duty each oscillator
//! runs at for the current sample, and owns the shared triangle LFO.

use crate::gen::PhaseOscillator;
use crate::params::{Control, Mode, ParameterBank, Slot};

/// Width of one semitone in octaves
pub const SEMITONE: f32 = 1.0 / 12.0;

/// Hard sync driver pitch limit in octaves (applied to external pitch CV)
pub const SYNC_DRIVER_LIMIT: f32 = 6.0;

/// Octaves added per unit of (1 + multiplier) in hard sync
pub const SYNC_MULTIPLIER_SCALE: f32 = 1.5;

/// Duty CV voltage range; the clamped voltage is divided by the maximum
pub const DUTY_CV_RANGE: (f32, f32) = (0.0, 10.0);

/// Control voltages patched into the voice. `None` means the jack is not connected.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CvInputs {
    pub primary_duty: Option<f32>,
    pub secondary_duty: Option<f32>,
    pub primary_pitch: Option<f32>,
    pub secondary_pitch: Option<f32>,
}

/// What one oscillator runs at for the current sample
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OscillatorDrive {
    /// Pitch in octaves relative to the oscillator's base frequency
    pub pitch: f32,
    /// Pulse duty
    pub duty: f32,
    /// Modulation added to the duty this sample (LFO in PWM mode, 0 otherwise)
    pub duty_offset: f32,
}

/// Routing result for one sample
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Modulation {
    pub primary: OscillatorDrive,
    pub secondary: OscillatorDrive,
    /// Triangle LFO value used this sample
    pub lfo: f32,
}

/// Snap a knob pitch down to whole semitones (toward zero)
#[inline]
pub fn quantize_semitone(pitch: f32) -> f32 {
    (pitch * 12.0).trunc() / 12.0
}

/// Normalize a duty CV voltage to a 0..1 duty
#[inline]
pub fn duty_from_cv(voltage: f32) -> f32 {
    let (min, max) = DUTY_CV_RANGE;
    voltage.clamp(min, max) / max
}

/// Computes each oscillator's pitch and duty from the bank, CV inputs and LFO
#[derive(Clone, Debug)]
pub struct ModulationRouter {
    lfo: PhaseOscillator,
}

impl ModulationRouter {
    pub fn new(lfo_base_frequency: f32) -> Self {
        Self {
            lfo: PhaseOscillator::new(lfo_base_frequency),
        }
    }

    pub fn lfo(&self) -> &PhaseOscillator {
        &self.lfo
    }

    /// Advance the LFO one sample and route the current mode
    pub fn route(&mut self, bank: &ParameterBank, cv: &CvInputs, sample_time: f32) -> Modulation {
        let mode = bank.mode();

        self.lfo.update_pitch(bank.slot(mode.rate_slot(bank.alt_layer())));
        self.lfo.advance(sample_time);
        let lfo = self.lfo.triangle();

        let primary_knob_pitch = quantize_semitone(bank.slot(Slot::PrimaryPitch));
        let primary_pitch = cv.primary_pitch.unwrap_or(primary_knob_pitch);
        let secondary_pitch = cv
            .secondary_pitch
            .unwrap_or_else(|| quantize_semitone(bank.slot(Slot::SecondaryPitch)));

        // Whatever cell the duty knob edits right now is the base duty
        let primary_duty_knob = bank.value(Control::PrimaryDuty);
        let secondary_duty_knob = bank.value(Control::SecondaryDuty);
        let primary_duty = cv.primary_duty.map(duty_from_cv).unwrap_or(primary_duty_knob);
        let secondary_duty = cv.secondary_duty.map(duty_from_cv).unwrap_or(secondary_duty_knob);

        let mut primary = OscillatorDrive {
            pitch: primary_pitch,
            duty: primary_duty,
            duty_offset: 0.0,
        };
        let mut secondary = OscillatorDrive {
            pitch: secondary_pitch,
            duty: secondary_duty,
            duty_offset: 0.0,
        };

        match mode {
            Mode::Chorus => {
                let depth = mode.depth_slot().map(|slot| bank.slot(slot)).unwrap_or(0.0);
                secondary.pitch += lfo * (depth + 1.0).ln();
            }
            Mode::LfoPwm => {
                for drive in [&mut primary, &mut secondary] {
                    drive.duty = (drive.duty + lfo).clamp(-1.0, 1.0);
                    drive.duty_offset = lfo;
                }
            }
            Mode::LfoFm => {
                primary.pitch += lfo;
                secondary.pitch += lfo;
            }
            Mode::HardSync => {
                let driver = cv
                    .primary_pitch
                    .map(|pitch| pitch.clamp(-SYNC_DRIVER_LIMIT, SYNC_DRIVER_LIMIT))
                    .unwrap_or(primary_knob_pitch);
                let multiplier = bank.slot(Slot::SyncMultiplier);
                secondary.pitch = driver + (1.0 + multiplier) * SYNC_MULTIPLIER_SCALE;
            }
        }

        Modulation {
            primary,
            secondary,
            lfo,
        }
    }

    /// Advance both audio oscillators one sample.
    ///
    /// In hard sync a Primary wrap resets the Secondary instead of advancing it. Returns
    /// whether the Primary wrapped.
    #[inline]
    pub fn advance_oscillators(
        mode: Mode,
        primary: &mut PhaseOscillator,
        secondary: &mut PhaseOscillator,
        sample_time: f32,
    ) -> bool {
        let wrapped = primary.advance(sample_time);
        if mode == Mode::HardSync && wrapped {
            secondary.reset_phase();
        } else {
            secondary.advance(sample_time);
        }
        wrapped
    }
}
