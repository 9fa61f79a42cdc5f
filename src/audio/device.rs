// Audio backend - CPAL output stream rendering the commanded tone
// The callback reads one atomic and synthesizes; no allocations, no locks

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::audio::parameters::SharedToneParams;
use crate::audio::tone::{ToneSynth, Waveform};

/// Errors opening or starting the audio backend.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),
}

/// Desktop stand-in for the buzzer/PWM hardware the sequencer was
/// designed to drive: a CPAL output stream playing a single tone whose
/// frequency and level arrive through a [`SharedToneParams`].
///
/// The stream itself is not `Send`, so the sequencer is not handed the
/// backend directly; it writes into the cloneable [`handle`](AudioOutput::handle)
/// instead.
pub struct AudioOutput {
    _stream: Stream,
    params: SharedToneParams,
    sample_rate: f32,
}

impl AudioOutput {
    /// Open the default output device and start a silent stream.
    pub fn new(waveform: Waveform) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        let params = SharedToneParams::new();
        let synth = ToneSynth::new(waveform, sample_rate);

        let stream = match sample_format {
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &config, channels, params.clone(), synth)?
            }
            SampleFormat::I16 => {
                build_stream::<i16>(&device, &config, channels, params.clone(), synth)?
            }
            SampleFormat::U16 => {
                build_stream::<u16>(&device, &config, channels, params.clone(), synth)?
            }
            other => return Err(AudioError::UnsupportedFormat(other)),
        };
        stream.play()?;

        Ok(Self {
            _stream: stream,
            params,
            sample_rate,
        })
    }

    /// Cloneable tone handle to hand to a `MelodyPlayer` as its output.
    pub fn handle(&self) -> SharedToneParams {
        self.params.clone()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

/// Build an output stream for any device sample format. Synthesis is
/// f32 internally; conversion happens per frame on the way out.
fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    channels: usize,
    params: SharedToneParams,
    mut synth: ToneSynth,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32> + Send + 'static,
{
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let (frequency_hz, level) = params.load();
            synth.set_tone(frequency_hz, level);

            for frame in data.chunks_mut(channels) {
                let sample = synth.next_sample();
                for out in frame.iter_mut() {
                    *out = T::from_sample(sample);
                }
            }
        },
        move |err| {
            // Runs outside the audio callback, so printing is fine here
            eprintln!("Audio stream error: {err}");
        },
        None,
    )?;

    Ok(stream)
}
