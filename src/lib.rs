//! Dual-oscillator synth voice with a shared LFO, four modulation modes and a
//! mode-layered parameter bank.
//!
//! The per-sample entry point is [`Voice::process`]. Native hosts drive it through
//! [`platform`]; offline renders go through `bounce` (feature `bounce`).

pub mod engine;
pub mod gen;
pub mod params;

// Platform abstraction layer
pub mod platform;

pub mod utils;

#[cfg(feature = "bounce")]
pub mod bounce;

pub use engine::{CvInputs, Voice, VoiceConfig, VoiceInputs, VoiceOutputs};
pub use gen::{PhaseOscillator, Signals};
pub use params::{Control, ControlSurface, Mode, ParameterBank, Slot};
