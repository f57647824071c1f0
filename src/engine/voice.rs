//! The dual-oscillator voice
//!
//! Runs the per-sample control flow: throttled reconciliation of the parameter bank,
//! modulation routing, oscillator advance (with hard sync), waveform rendering and
//! mixing into the Primary, Mix and Secondary outputs.

use std::path::Path;

use crate::engine::mixer::{combine, crossfade, render_oscillator, WaveLevels};
use crate::engine::router::{CvInputs, Modulation, ModulationRouter};
use crate::gen::PhaseOscillator;
use crate::params::{ControlSurface, ParameterBank, RestoreReport, Slot};

/// Samples between two reconciliations of the bank with the control surface
pub const RECONCILE_INTERVAL: u64 = 128;

/// Middle C, reference pitch of the audio oscillators
pub const DEFAULT_BASE_FREQUENCY: f32 = 261.6256;

/// LFO frequency at rate 0
pub const DEFAULT_LFO_BASE_FREQUENCY: f32 = 0.1;

/// Static configuration of a voice
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceConfig {
    pub primary_base_frequency: f32,   // Hz at pitch 0
    pub secondary_base_frequency: f32, // Hz at pitch 0
    pub lfo_base_frequency: f32,       // Hz at rate 0
}

impl VoiceConfig {
    pub fn new(primary_base_frequency: f32, secondary_base_frequency: f32, lfo_base_frequency: f32) -> Self {
        Self {
            primary_base_frequency: primary_base_frequency.clamp(1.0, 20000.0),
            secondary_base_frequency: secondary_base_frequency.clamp(1.0, 20000.0),
            lfo_base_frequency: lfo_base_frequency.clamp(0.001, 100.0),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_FREQUENCY, DEFAULT_BASE_FREQUENCY, DEFAULT_LFO_BASE_FREQUENCY)
    }
}

/// Inputs supplied with every sample
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoiceInputs {
    /// Sample period in seconds
    pub sample_time: f32,
    pub cv: CvInputs,
}

impl VoiceInputs {
    pub fn new(sample_time: f32) -> Self {
        Self {
            sample_time,
            cv: CvInputs::default(),
        }
    }

    pub fn from_sample_rate(sample_rate: f32) -> Self {
        Self::new(1.0 / sample_rate)
    }
}

/// Output voltages for one sample, each nominally within +/-5
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoiceOutputs {
    pub primary: f32,
    pub mix: f32,
    pub secondary: f32,
}

/// Two audio oscillators, the shared LFO and the parameter bank of one voice
pub struct Voice {
    config: VoiceConfig,
    primary: PhaseOscillator,
    secondary: PhaseOscillator,
    router: ModulationRouter,
    bank: ParameterBank,
    modulation: Modulation,
    sample_count: u64,
}

impl Voice {
    pub fn new() -> Self {
        Self::with_config(VoiceConfig::default())
    }

    pub fn with_config(config: VoiceConfig) -> Self {
        Self {
            config,
            primary: PhaseOscillator::new(config.primary_base_frequency),
            secondary: PhaseOscillator::new(config.secondary_base_frequency),
            router: ModulationRouter::new(config.lfo_base_frequency),
            bank: ParameterBank::new(),
            modulation: Modulation::default(),
            sample_count: 0,
        }
    }

    /// Generate one sample.
    ///
    /// Reconciles the bank with `surface` on every `RECONCILE_INTERVAL`th sample
    /// (starting with the first), then routes, advances and mixes.
    #[inline]
    pub fn process(&mut self, surface: &mut ControlSurface, inputs: &VoiceInputs) -> VoiceOutputs {
        if self.sample_count % RECONCILE_INTERVAL == 0 {
            self.bank.reconcile(surface);
        }
        self.sample_count += 1;

        let modulation = self.router.route(&self.bank, &inputs.cv, inputs.sample_time);
        self.modulation = modulation;

        self.primary.update_pitch(modulation.primary.pitch);
        self.secondary.update_pitch(modulation.secondary.pitch);
        ModulationRouter::advance_oscillators(
            self.bank.mode(),
            &mut self.primary,
            &mut self.secondary,
            inputs.sample_time,
        );

        let primary_signals = render_oscillator(
            &self.primary,
            modulation.primary.duty,
            modulation.primary.duty_offset,
        );
        let secondary_signals = render_oscillator(
            &self.secondary,
            modulation.secondary.duty,
            modulation.secondary.duty_offset,
        );

        let primary = combine(primary_signals, WaveLevels::primary(&self.bank));
        let secondary = combine(secondary_signals, WaveLevels::secondary(&self.bank));
        let mix = crossfade(primary, secondary, self.bank.slot(Slot::Crossfade));

        VoiceOutputs {
            primary,
            mix,
            secondary,
        }
    }

    /// Restore a patch and move the selectors on `surface` to the restored mode and alt
    /// layer. Knobs follow on the next reconciliation.
    pub fn restore_patch(&mut self, surface: &mut ControlSurface, json: &str) -> anyhow::Result<RestoreReport> {
        let report = self.bank.restore_json(json)?;
        self.bank.write_selectors(surface);
        Ok(report)
    }

    /// Load a patch file, see [`Voice::restore_patch`]
    pub fn load_patch(&mut self, surface: &mut ControlSurface, path: &Path) -> anyhow::Result<RestoreReport> {
        let report = self.bank.load_from_file(path)?;
        self.bank.write_selectors(surface);
        Ok(report)
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    pub fn bank(&self) -> &ParameterBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut ParameterBank {
        &mut self.bank
    }

    pub fn primary(&self) -> &PhaseOscillator {
        &self.primary
    }

    pub fn secondary(&self) -> &PhaseOscillator {
        &self.secondary
    }

    pub fn lfo(&self) -> &PhaseOscillator {
        self.router.lfo()
    }

    /// Routing result of the most recent sample
    pub fn modulation(&self) -> &Modulation {
        &self.modulation
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_clamps() {
        let config = VoiceConfig::new(0.0, 50000.0, 0.0);
        assert_eq!(config.primary_base_frequency, 1.0);
        assert_eq!(config.secondary_base_frequency, 20000.0);
        assert_eq!(config.lfo_base_frequency, 0.001);
    }

    #[test]
    fn test_outputs_are_finite_and_bounded() {
        let mut voice = Voice::new();
        let mut surface = ControlSurface::new();
        let inputs = VoiceInputs::from_sample_rate(48000.0);

        for _ in 0..4800 {
            let out = voice.process(&mut surface, &inputs);
            for value in [out.primary, out.mix, out.secondary] {
                assert!(value.is_finite());
                assert!(value.abs() <= 5.0);
            }
        }
        assert_eq!(voice.sample_count(), 4800);
    }
}
