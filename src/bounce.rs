//! Offline rendering of a voice to a WAV file

use std::path::Path;

use anyhow::Context;
use hound::{WavSpec, WavWriter};

use crate::engine::{Voice, VoiceInputs, VoiceOutputs, OUTPUT_SCALE};
use crate::params::ControlSurface;

/// Which voice output gets written to each channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BounceLayout {
    /// One channel carrying the Mix output
    #[default]
    Mix,
    /// Three channels: Primary, Mix, Secondary
    AllOutputs,
}

impl BounceLayout {
    fn channels(self) -> u16 {
        match self {
            BounceLayout::Mix => 1,
            BounceLayout::AllOutputs => 3,
        }
    }
}

/// Settings for an offline render
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BounceConfig {
    pub sample_rate: u32,
    pub duration_seconds: f32,
    pub layout: BounceLayout,
}

impl BounceConfig {
    pub fn new(sample_rate: u32, duration_seconds: f32, layout: BounceLayout) -> Self {
        Self {
            sample_rate: sample_rate.clamp(8000, 192000),
            duration_seconds: duration_seconds.max(0.0),
            layout,
        }
    }

    pub fn frames(&self) -> usize {
        (self.duration_seconds * self.sample_rate as f32).round() as usize
    }
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self::new(48000, 2.0, BounceLayout::Mix)
    }
}

/// Render `config.duration_seconds` of the voice into a 32-bit float WAV file.
///
/// Samples are scaled from the +/-5 voltage range to +/-1. Returns the number of frames
/// written.
pub fn render_to_wav(
    voice: &mut Voice,
    surface: &mut ControlSurface,
    inputs: &VoiceInputs,
    config: &BounceConfig,
    path: &Path,
) -> anyhow::Result<usize> {
    let spec = WavSpec {
        channels: config.layout.channels(),
        sample_rate: config.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let inputs = VoiceInputs {
        sample_time: 1.0 / config.sample_rate as f32,
        ..*inputs
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let frames = config.frames();
    for _ in 0..frames {
        let VoiceOutputs { primary, mix, secondary } = voice.process(surface, &inputs);
        match config.layout {
            BounceLayout::Mix => writer.write_sample(mix / OUTPUT_SCALE)?,
            BounceLayout::AllOutputs => {
                writer.write_sample(primary / OUTPUT_SCALE)?;
                writer.write_sample(mix / OUTPUT_SCALE)?;
                writer.write_sample(secondary / OUTPUT_SCALE)?;
            }
        }
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize {}", path.display()))?;
    log::info!("Bounced {} frames to {}", frames, path.display());

    Ok(frames)
}
