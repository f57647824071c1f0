#[cfg(feature = "native")]
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SizedSample, FromSample, Sample, Stream, Device, StreamConfig,
};
use super::{lock, AudioOutput, VoiceEngine};
use crate::engine::{Voice, VoiceInputs, OUTPUT_SCALE};
use crate::params::ControlSurface;
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[cfg(feature = "native")]
pub struct CpalOutput {
    stream: Option<Stream>,
    device: Option<Device>,
    config: Option<StreamConfig>,
    sample_rate: f32,
    is_active: bool,
    start_time: Option<Instant>,
}

#[cfg(feature = "native")]
impl CpalOutput {
    pub fn new() -> Self {
        Self {
            stream: None,
            device: None,
            config: None,
            sample_rate: 44100.0,
            is_active: false,
            start_time: None,
        }
    }

    /// Create a stream that renders the engine's Mix output on every channel
    pub fn create_stream_with_engine(&mut self, engine: &VoiceEngine) -> Result<(), anyhow::Error> {
        self.create_stream_with_voice(engine.voice(), engine.surface(), engine.inputs())
    }

    /// Create a stream with a voice, its control surface and its CV inputs
    pub fn create_stream_with_voice(
        &mut self,
        voice: Arc<Mutex<Voice>>,
        surface: Arc<Mutex<ControlSurface>>,
        inputs: Arc<Mutex<VoiceInputs>>,
    ) -> Result<(), anyhow::Error> {
        let device = self.device.as_ref().ok_or_else(|| anyhow::anyhow!("Device not initialized"))?;
        let config = self.config.as_ref().ok_or_else(|| anyhow::anyhow!("Config not initialized"))?;

        // The device decides the sample period, whatever the engine was built with
        lock(&inputs).sample_time = 1.0 / config.sample_rate.0 as f32;

        let supported_config = device.default_output_config()?;
        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::I8 => Self::make_stream::<i8>(device, config, voice, surface, inputs)?,
            cpal::SampleFormat::I16 => Self::make_stream::<i16>(device, config, voice, surface, inputs)?,
            cpal::SampleFormat::I32 => Self::make_stream::<i32>(device, config, voice, surface, inputs)?,
            cpal::SampleFormat::I64 => Self::make_stream::<i64>(device, config, voice, surface, inputs)?,
            cpal::SampleFormat::U8 => Self::make_stream::<u8>(device, config, voice, surface, inputs)?,
            cpal::SampleFormat::U16 => Self::make_stream::<u16>(device, config, voice, surface, inputs)?,
            cpal::SampleFormat::U32 => Self::make_stream::<u32>(device, config, voice, surface, inputs)?,
            cpal::SampleFormat::U64 => Self::make_stream::<u64>(device, config, voice, surface, inputs)?,
            cpal::SampleFormat::F32 => Self::make_stream::<f32>(device, config, voice, surface, inputs)?,
            cpal::SampleFormat::F64 => Self::make_stream::<f64>(device, config, voice, surface, inputs)?,
            sample_format => return Err(anyhow::anyhow!("Unsupported sample format '{}'", sample_format)),
        };

        self.stream = Some(stream);
        Ok(())
    }

    /// Setup the CPAL host and device
    fn setup_host_device(&mut self) -> Result<(), anyhow::Error> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("Default output device is not available"))?;

        log::info!("Output device: {}", device.name()?);

        let config = device.default_output_config()?;
        log::debug!("Default output config: {:?}", config);

        self.sample_rate = config.sample_rate().0 as f32;
        self.device = Some(device);
        self.config = Some(config.into());

        Ok(())
    }

    /// Create a typed stream for the given sample format
    fn make_stream<T>(
        device: &Device,
        config: &StreamConfig,
        voice: Arc<Mutex<Voice>>,
        surface: Arc<Mutex<ControlSurface>>,
        inputs: Arc<Mutex<VoiceInputs>>,
    ) -> Result<Stream, anyhow::Error>
    where
        T: SizedSample + FromSample<f32>,
    {
        let num_channels = config.channels as usize;

        let err_fn = |err| log::error!("Error building output sound stream: {}", err);

        let stream = device.build_output_stream(
            config,
            move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
                Self::process_frame(output, &voice, &surface, &inputs, num_channels);
            },
            err_fn,
            None,
        )?;

        Ok(stream)
    }

    /// Process a buffer of interleaved frames
    fn process_frame<SampleType>(
        output: &mut [SampleType],
        voice: &Arc<Mutex<Voice>>,
        surface: &Arc<Mutex<ControlSurface>>,
        inputs: &Arc<Mutex<VoiceInputs>>,
        num_channels: usize,
    ) where
        SampleType: Sample + FromSample<f32>,
    {
        // Lock once for the entire buffer
        let mut voice = lock(voice);
        let mut surface = lock(surface);
        let inputs = *lock(inputs);

        for frame in output.chunks_mut(num_channels) {
            let mix = voice.process(&mut surface, &inputs).mix / OUTPUT_SCALE;
            let value: SampleType = SampleType::from_sample(mix);

            // Copy the same value to all channels
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}

#[cfg(feature = "native")]
impl Default for CpalOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "native")]
impl AudioOutput for CpalOutput {
    fn initialize(&mut self, sample_rate: f32) -> Result<(), anyhow::Error> {
        self.sample_rate = sample_rate;
        self.setup_host_device()?;
        Ok(())
    }

    fn start(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.play()?;
            self.is_active = true;
            self.start_time = Some(Instant::now());
            log::info!("Audio stream started at sample rate: {}", self.sample_rate);
        } else {
            return Err(anyhow::anyhow!("Stream not created. Call create_stream_with_voice first."));
        }

        Ok(())
    }

    fn stop(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.pause()?;
            self.is_active = false;
            if let Some(start) = self.start_time.take() {
                log::info!("Audio stream stopped after {:.2}s", start.elapsed().as_secs_f32());
            }
        }

        Ok(())
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}
