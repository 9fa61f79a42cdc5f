// Note token - one scanned note and its duration math

use super::header::MelodyHeader;

/// One note scanned from the notes section of an RTTTL string.
///
/// Fields the token did not spell out stay `None` and are resolved
/// against the melody header at scheduling time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteToken {
    /// Explicit duration code (1, 2, 4, 8, 16, 32), if present
    pub duration_code: Option<u32>,
    /// Semitone within the octave (c = 0 .. b = 11, sharp applied);
    /// `None` is a rest
    pub semitone: Option<u8>,
    /// Dotted note: duration extended by half
    pub dotted: bool,
    /// Explicit octave digit, if present
    pub octave: Option<u8>,
}

impl NoteToken {
    /// True when this token is silence.
    pub fn is_rest(&self) -> bool {
        self.semitone.is_none()
    }

    /// Parsed duration in milliseconds, before any staccato gap.
    ///
    /// Whole note divided by the duration code; a dot adds half. A
    /// missing or zero code falls back to the header default, like
    /// every other absent field.
    pub fn duration_ms(&self, header: &MelodyHeader) -> u32 {
        let code = match self.duration_code {
            Some(code) if code > 0 => code,
            _ => header.default_duration,
        };
        let mut duration = header.whole_note_ms / code;
        if self.dotted {
            duration += duration / 2;
        }
        duration
    }

    /// Octave this note sounds in, resolved against the header default.
    pub fn octave_or_default(&self, header: &MelodyHeader) -> u8 {
        self.octave.unwrap_or(header.default_octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_120bpm() -> MelodyHeader {
        // 120 BPM: whole note = 2000ms
        MelodyHeader {
            default_duration: 4,
            default_octave: 5,
            whole_note_ms: 2000,
        }
    }

    fn token(duration_code: Option<u32>, dotted: bool) -> NoteToken {
        NoteToken {
            duration_code,
            semitone: Some(0),
            dotted,
            octave: None,
        }
    }

    #[test]
    fn test_default_duration() {
        // No explicit code: whole note / 4 = 500ms
        assert_eq!(token(None, false).duration_ms(&header_120bpm()), 500);
    }

    #[test]
    fn test_explicit_duration() {
        assert_eq!(token(Some(8), false).duration_ms(&header_120bpm()), 250);
        assert_eq!(token(Some(1), false).duration_ms(&header_120bpm()), 2000);
        assert_eq!(token(Some(32), false).duration_ms(&header_120bpm()), 62);
    }

    #[test]
    fn test_dotted_adds_half() {
        // 500ms base * 1.5 = 750ms
        assert_eq!(token(None, true).duration_ms(&header_120bpm()), 750);
        assert_eq!(token(Some(8), true).duration_ms(&header_120bpm()), 375);
    }

    #[test]
    fn test_zero_code_falls_back() {
        assert_eq!(token(Some(0), false).duration_ms(&header_120bpm()), 500);
    }

    #[test]
    fn test_octave_resolution() {
        let explicit = NoteToken {
            duration_code: None,
            semitone: Some(0),
            dotted: false,
            octave: Some(7),
        };
        assert_eq!(explicit.octave_or_default(&header_120bpm()), 7);
        assert_eq!(token(None, false).octave_or_default(&header_120bpm()), 5);
    }
}
