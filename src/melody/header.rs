// RTTTL header - name, playback defaults, and tempo
// Parses the "name:d=4,o=6,b=63:" section into per-melody defaults

use super::tokenizer::scan_number;

/// Fallback duration code when neither the note nor the header has one.
pub const DEFAULT_DURATION: u32 = 4;
/// Fallback octave when neither the note nor the header has one.
pub const DEFAULT_OCTAVE: u8 = 6;
/// Fallback tempo in beats per minute.
pub const DEFAULT_BPM: u32 = 63;

/// Header-derived defaults for one melody.
///
/// BPM counts quarter notes, so the whole-note duration is
/// `60_000 * 4 / bpm` milliseconds. The BPM itself is not kept around;
/// only the derived whole-note duration matters during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MelodyHeader {
    /// Duration code (1, 2, 4, 8, 16, 32) used when a note carries none
    pub default_duration: u32,
    /// Octave used when a note carries none
    pub default_octave: u8,
    /// Duration of an undivided whole note in milliseconds
    pub whole_note_ms: u32,
}

impl MelodyHeader {
    /// Parse the header section of an RTTTL string.
    ///
    /// The name field is skipped through the first `:`. After it,
    /// comma-separated `d=`/`o=`/`b=` pairs are scanned (each optional,
    /// any order) up to the `:` that opens the notes section. Returns
    /// the header and the cursor positioned at the first note byte.
    ///
    /// There is no error channel: unrecognized keys are skipped,
    /// out-of-range values fall back field by field, and a string with
    /// no separators at all yields pure defaults with the cursor at the
    /// end (an immediately finished melody).
    pub fn parse(melody: &str) -> (Self, usize) {
        let bytes = melody.as_bytes();
        let mut pos = 0;

        // Name field, ignored.
        while pos < bytes.len() && bytes[pos] != b':' {
            pos += 1;
        }
        if pos < bytes.len() {
            pos += 1;
        }

        let mut duration = DEFAULT_DURATION;
        let mut octave = DEFAULT_OCTAVE;
        let mut bpm = DEFAULT_BPM;

        while pos < bytes.len() && bytes[pos] != b':' {
            let key = bytes[pos].to_ascii_lowercase();
            if pos + 1 < bytes.len() && bytes[pos + 1] == b'=' {
                let (value, next) = scan_number(melody, pos + 2);
                pos = next;
                match key {
                    b'd' if value > 0 => duration = value,
                    b'o' if (4..=7).contains(&value) => octave = value as u8,
                    b'b' if value > 0 => bpm = value,
                    _ => {}
                }
            } else {
                pos += 1;
            }
            if pos < bytes.len() && bytes[pos] == b',' {
                pos += 1;
            }
        }
        if pos < bytes.len() {
            pos += 1;
        }

        let header = Self {
            default_duration: duration,
            default_octave: octave,
            whole_note_ms: 60_000 * 4 / bpm,
        };
        (header, pos)
    }
}

impl Default for MelodyHeader {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_DURATION,
            default_octave: DEFAULT_OCTAVE,
            whole_note_ms: 60_000 * 4 / DEFAULT_BPM,
        }
    }
}
