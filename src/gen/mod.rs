pub mod oscillator;
pub mod waveform;

pub use self::oscillator::*;
pub use self::waveform::*;
