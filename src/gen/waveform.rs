/// One sample of every waveform an oscillator renders, each in [-1, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Signals {
    pub ramp: f32,
    pub pulse: f32,
    pub sub: f32,
}

impl Signals {
    pub fn new(ramp: f32, pulse: f32, sub: f32) -> Self {
        Self { ramp, pulse, sub }
    }
}
