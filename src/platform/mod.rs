/// Platform abstraction for audio output
/// This module drives a voice from a platform audio callback (native CPAL, etc.)

use crate::engine::{Voice, VoiceConfig, VoiceInputs};
use crate::params::ControlSurface;
use std::sync::{Arc, Mutex, MutexGuard};

/// Trait for platform-specific audio output implementations
pub trait AudioOutput {
    /// Initialize the audio output with the given sample rate
    fn initialize(&mut self, sample_rate: f32) -> Result<(), anyhow::Error>;

    /// Start the audio stream
    fn start(&mut self) -> Result<(), anyhow::Error>;

    /// Stop the audio stream
    fn stop(&mut self) -> Result<(), anyhow::Error>;

    /// Get the current sample rate
    fn sample_rate(&self) -> f32;

    /// Check if the audio output is active
    fn is_active(&self) -> bool;
}

/// Voice plus the panel state shared between the control thread and the audio callback
pub struct VoiceEngine {
    voice: Arc<Mutex<Voice>>,
    surface: Arc<Mutex<ControlSurface>>,
    inputs: Arc<Mutex<VoiceInputs>>,
    sample_rate: f32,
}

impl VoiceEngine {
    /// Create a new engine with a default voice at the given sample rate
    pub fn new(sample_rate: f32) -> Self {
        Self::with_config(sample_rate, VoiceConfig::default())
    }

    pub fn with_config(sample_rate: f32, config: VoiceConfig) -> Self {
        Self {
            voice: Arc::new(Mutex::new(Voice::with_config(config))),
            surface: Arc::new(Mutex::new(ControlSurface::new())),
            inputs: Arc::new(Mutex::new(VoiceInputs::from_sample_rate(sample_rate))),
            sample_rate,
        }
    }

    /// Get the voice for use with audio output
    pub fn voice(&self) -> Arc<Mutex<Voice>> {
        self.voice.clone()
    }

    /// Get the control surface for use with audio output
    pub fn surface(&self) -> Arc<Mutex<ControlSurface>> {
        self.surface.clone()
    }

    /// Get the CV inputs for use with audio output
    pub fn inputs(&self) -> Arc<Mutex<VoiceInputs>> {
        self.inputs.clone()
    }

    /// Get the current sample rate
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Move controls from the control thread
    pub fn with_surface<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ControlSurface) -> R,
    {
        let mut surface = lock(&self.surface);
        f(&mut surface)
    }

    /// Patch or unpatch CV inputs from the control thread
    pub fn with_inputs<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut VoiceInputs) -> R,
    {
        let mut inputs = lock(&self.inputs);
        f(&mut inputs)
    }

    /// Render `output.len()` samples of the Mix output, normalized to +/-1
    pub fn render_mix(&self, output: &mut [f32]) {
        let mut voice = lock(&self.voice);
        let mut surface = lock(&self.surface);
        let inputs = *lock(&self.inputs);
        render_mix_block(&mut voice, &mut surface, &inputs, output);
    }

    /// Restore a patch into the voice and move the panel selectors accordingly
    pub fn restore_patch(&self, json: &str) -> anyhow::Result<crate::params::RestoreReport> {
        let mut voice = lock(&self.voice);
        let mut surface = lock(&self.surface);
        voice.restore_patch(&mut surface, json)
    }
}

/// Render a block of Mix samples scaled from the +/-5 voltage range to +/-1
pub fn render_mix_block(
    voice: &mut Voice,
    surface: &mut ControlSurface,
    inputs: &VoiceInputs,
    output: &mut [f32],
) {
    for sample in output.iter_mut() {
        *sample = voice.process(surface, inputs).mix / crate::engine::OUTPUT_SCALE;
    }
}

/// Lock shared state, recovering the data if another thread panicked while holding it
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// Platform-specific implementations
#[cfg(feature = "native")]
pub mod cpal_output;

// Re-export platform-specific types
#[cfg(feature = "native")]
pub use self::cpal_output::CpalOutput;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Control, Mode, Slot};

    #[test]
    fn test_render_mix_is_normalized() {
        let engine = VoiceEngine::new(48000.0);
        let mut block = [0.0; 512];

        // First block pushes the defaults, so the levels are moved afterwards
        engine.render_mix(&mut block);
        engine.with_surface(|surface| {
            surface.set(Control::PrimaryPulseLevel, 1.0);
            surface.set(Control::PrimarySubLevel, 1.0);
        });

        engine.render_mix(&mut block);
        {
            let voice = engine.voice();
            let voice = lock(&voice);
            assert_eq!(voice.bank().slot(Slot::PrimaryPulseLevel), 1.0);
            assert_eq!(voice.bank().slot(Slot::PrimarySubLevel), 1.0);
        }
        assert!(block.iter().all(|s| s.abs() <= 1.0));
        assert!(block.iter().any(|s| s.abs() > 0.0));
    }

    #[test]
    fn test_restore_moves_selectors() {
        let engine = VoiceEngine::new(48000.0);
        let json = r#"{"version": 1, "mode": 2, "altLayer": true, "cells": []}"#;

        let report = engine.restore_patch(json).expect("restore");
        assert_eq!(report.restored, 0);
        engine.with_surface(|surface| {
            assert_eq!(Mode::from_position(surface.get(Control::ModeSelect)), Mode::LfoFm);
            assert_eq!(surface.get(Control::AltLayer), 1.0);
        });
    }
}
