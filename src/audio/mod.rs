// Audio module - CPAL backend, tone synthesis, and offline render

pub mod device;
pub mod export;
pub mod parameters;
pub mod tone;

pub use device::{AudioError, AudioOutput};
pub use export::{ExportError, WavExportSettings, render_to_wav};
pub use parameters::SharedToneParams;
pub use tone::{ToneSynth, Waveform};
