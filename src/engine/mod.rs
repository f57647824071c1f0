//! Per-sample voice engine: modulation routing, mixing and the voice driver

pub mod mixer;
pub mod router;
pub mod voice;

pub use mixer::{combine, crossfade, render_oscillator, WaveLevels, OUTPUT_SCALE};
pub use router::{CvInputs, Modulation, ModulationRouter, OscillatorDrive};
pub use voice::{Voice, VoiceConfig, VoiceInputs, VoiceOutputs, RECONCILE_INTERVAL};
