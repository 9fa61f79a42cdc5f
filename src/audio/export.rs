// Offline WAV render - melody to file, as fast as the disk allows
// Steps the sequencer over simulated milliseconds instead of a wall clock

use hound::{WavSpec, WavWriter};
use std::path::Path;

use crate::audio::parameters::SharedToneParams;
use crate::audio::tone::{ToneSynth, Waveform};
use crate::sequencer::MelodyPlayer;

/// Errors writing the rendered melody to disk.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("WAV write failed: {0}")]
    Wav(#[from] hound::Error),
}

/// Settings for an offline melody render.
#[derive(Debug, Clone)]
pub struct WavExportSettings {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Waveform for the rendered tone
    pub waveform: Waveform,
    /// Volume level in [0, 1]
    pub level: f32,
    /// Hard cap on the rendered length; a melody with a crawling tempo
    /// stops here instead of filling the disk
    pub max_duration_ms: u64,
}

impl Default for WavExportSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            waveform: Waveform::Square,
            level: 0.6,
            max_duration_ms: 120_000,
        }
    }
}

/// Render an RTTTL melody to a mono 16-bit WAV file.
///
/// The sequencer runs against a simulated clock derived from the
/// sample index, so the render is sample-exact regardless of how fast
/// it executes. Returns the number of samples written.
pub fn render_to_wav(
    melody: &str,
    settings: &WavExportSettings,
    path: &Path,
) -> Result<u64, ExportError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: settings.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;

    let params = SharedToneParams::new();
    let mut player = MelodyPlayer::new(Box::new(params.clone()));
    let mut synth = ToneSynth::new(settings.waveform, settings.sample_rate as f32);

    player.play_with_level(melody, settings.level, 0);

    let mut sample_index: u64 = 0;
    while player.is_playing() {
        let now_ms = sample_index * 1000 / u64::from(settings.sample_rate);
        if now_ms >= settings.max_duration_ms {
            break;
        }
        player.tick(now_ms);

        let (frequency_hz, level) = params.load();
        synth.set_tone(frequency_hz, level);

        let sample = (synth.next_sample() * f32::from(i16::MAX)).clamp(
            f32::from(i16::MIN),
            f32::from(i16::MAX),
        ) as i16;
        writer.write_sample(sample)?;
        sample_index += 1;
    }

    writer.finalize()?;
    Ok(sample_index)
}
