// Sequencer module - non-blocking melody playback

pub mod player;

pub use player::{FinishedCallback, MelodyPlayer, PlaybackState, STACCATO_GAP_MS};
