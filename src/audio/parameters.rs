// Shared tone parameters - lock-free control ↔ audio-callback path
// The commanded pair is packed into one atomic so the callback can
// never observe a new frequency with a stale level

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// The (frequency, level) pair commanded by the sequencer, shared with
/// an audio callback. Both f32 values live as bit patterns in a single
/// `AtomicU64`; neither side ever takes a lock.
#[derive(Clone)]
pub struct SharedToneParams {
    bits: Arc<AtomicU64>,
}

impl SharedToneParams {
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(pack(0.0, 0.0))),
        }
    }

    /// Commit a new pair (control thread side).
    pub fn store(&self, frequency_hz: f32, level: f32) {
        self.bits.store(pack(frequency_hz, level), Ordering::Relaxed);
    }

    /// Read the current pair (audio callback side).
    pub fn load(&self) -> (f32, f32) {
        unpack(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for SharedToneParams {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::output::ToneOutput for SharedToneParams {
    fn write(&mut self, frequency_hz: f32, level: f32) {
        self.store(frequency_hz, level);
    }
}

fn pack(frequency_hz: f32, level: f32) -> u64 {
    (u64::from(frequency_hz.to_bits()) << 32) | u64::from(level.to_bits())
}

fn unpack(bits: u64) -> (f32, f32) {
    (
        f32::from_bits((bits >> 32) as u32),
        f32::from_bits(bits as u32),
    )
}
