// rtttl_player - Non-blocking RTTTL melody parsing and playback

pub mod audio;
pub mod melody;
pub mod output;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use audio::device::{AudioError, AudioOutput};
pub use audio::export::{ExportError, WavExportSettings, render_to_wav};
pub use audio::parameters::SharedToneParams;
pub use audio::tone::{ToneSynth, Waveform};
pub use melody::header::MelodyHeader;
pub use melody::note::NoteToken;
pub use melody::pitch::note_frequency;
pub use output::{NullOutput, ToneOutput};
pub use sequencer::player::{FinishedCallback, MelodyPlayer, PlaybackState, STACCATO_GAP_MS};
