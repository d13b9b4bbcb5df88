use std::f32::consts::PI;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chipquirk::AudioSink;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

const TONE_HZ: f32 = 480.0;
const AMPLITUDE: f32 = 0.25;

/// A cpal output stream that runs for the whole session and plays a sine
/// while the shared flag is set, silence otherwise.
pub struct Sound {
    _stream: cpal::Stream,
    enabled: Arc<AtomicBool>,
}

impl Sound {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("no output device available"))?;
        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let enabled = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            cpal::SampleFormat::I8 => Self::run::<i8>(&device, &config, enabled.clone()),
            cpal::SampleFormat::I16 => Self::run::<i16>(&device, &config, enabled.clone()),
            cpal::SampleFormat::I32 => Self::run::<i32>(&device, &config, enabled.clone()),
            cpal::SampleFormat::I64 => Self::run::<i64>(&device, &config, enabled.clone()),
            cpal::SampleFormat::U8 => Self::run::<u8>(&device, &config, enabled.clone()),
            cpal::SampleFormat::U16 => Self::run::<u16>(&device, &config, enabled.clone()),
            cpal::SampleFormat::U32 => Self::run::<u32>(&device, &config, enabled.clone()),
            cpal::SampleFormat::U64 => Self::run::<u64>(&device, &config, enabled.clone()),
            cpal::SampleFormat::F32 => Self::run::<f32>(&device, &config, enabled.clone()),
            cpal::SampleFormat::F64 => Self::run::<f64>(&device, &config, enabled.clone()),
            sample_format => anyhow::bail!("unsupported sample format '{sample_format}'"),
        }?;

        Ok(Self {
            _stream: stream,
            enabled,
        })
    }

    fn run<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        enabled: Arc<AtomicBool>,
    ) -> anyhow::Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            if enabled.load(Ordering::Relaxed) {
                AMPLITUDE * (sample_clock * TONE_HZ * 2.0 * PI / sample_rate).sin()
            } else {
                0.0
            }
        };

        let err_fn = |err| log::error!("an error occurred on the audio stream: {err}");

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                Self::write_data(data, channels, &mut next_value)
            },
            err_fn,
            None,
        )?;
        stream.play()?;
        Ok(stream)
    }

    fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
    where
        T: Sample + FromSample<f32>,
    {
        for frame in output.chunks_mut(channels) {
            let value: T = T::from_sample(next_sample());
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}

impl AudioSink for Sound {
    fn set_tone(&mut self, enabled: bool) {
        log::debug!("tone {}", if enabled { "on" } else { "off" });
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

/// Used when no audio device can be opened.
pub struct Mute;

impl AudioSink for Mute {
    fn set_tone(&mut self, _enabled: bool) {}
}

/// Whichever output the host ended up with.
pub enum AudioOut {
    Device(Sound),
    Mute(Mute),
}

impl AudioOut {
    pub fn open() -> Self {
        match Sound::new() {
            Ok(sound) => Self::Device(sound),
            Err(e) => {
                log::warn!("audio unavailable, running silent: {e}");
                Self::Mute(Mute)
            }
        }
    }
}

impl AudioSink for AudioOut {
    fn set_tone(&mut self, enabled: bool) {
        match self {
            Self::Device(sound) => sound.set_tone(enabled),
            Self::Mute(mute) => mute.set_tone(enabled),
        }
    }
}
