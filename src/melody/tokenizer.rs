// Note tokenizer - incremental scanner over the notes section
// Pure cursor-in, cursor-out functions; the scheduler never re-reads text

use super::note::NoteToken;

/// Scan an unsigned decimal number starting at `pos`.
///
/// Returns the value and the cursor past the last digit. The loop is
/// bounded by the digits actually present, so it terminates on any
/// input; oversized values saturate instead of wrapping.
pub fn scan_number(melody: &str, mut pos: usize) -> (u32, usize) {
    let bytes = melody.as_bytes();
    let mut value: u32 = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add(u32::from(bytes[pos] - b'0'));
        pos += 1;
    }
    (value, pos)
}

/// Scan one comma-terminated note token starting at `cursor`.
///
/// Grammar, every field optional: leading digits (duration code), one
/// letter `a`-`g` or `p` (case-insensitive), `#`, `.`, one trailing
/// digit (octave), `,`. A token with no recognizable note letter
/// degenerates to a rest; whatever happens, the cursor advances by at
/// least one byte on a non-empty remainder, so the caller always makes
/// forward progress.
pub fn next_token(melody: &str, cursor: usize) -> (NoteToken, usize) {
    let bytes = melody.as_bytes();

    let (number, mut pos) = scan_number(melody, cursor);
    let duration_code = if pos > cursor { Some(number) } else { None };

    let mut semitone = None;
    if pos < bytes.len() {
        semitone = semitone_for_letter(bytes[pos]);
        pos += 1;
    }

    let mut sharp = false;
    if pos < bytes.len() && bytes[pos] == b'#' {
        sharp = true;
        pos += 1;
    }

    let mut dotted = false;
    if pos < bytes.len() && bytes[pos] == b'.' {
        dotted = true;
        pos += 1;
    }

    let mut octave = None;
    if pos < bytes.len() && bytes[pos].is_ascii_digit() {
        octave = Some(bytes[pos] - b'0');
        pos += 1;
    }

    if pos < bytes.len() && bytes[pos] == b',' {
        pos += 1;
    }

    let token = NoteToken {
        duration_code,
        semitone: semitone.map(|s| s + u8::from(sharp)),
        dotted,
        octave,
    };
    (token, pos)
}

/// Semitone within the octave for a note letter (c = 0 .. b = 11).
/// `p` and anything unrecognized are silence.
fn semitone_for_letter(letter: u8) -> Option<u8> {
    match letter.to_ascii_lowercase() {
        b'c' => Some(0),
        b'd' => Some(2),
        b'e' => Some(4),
        b'f' => Some(5),
        b'g' => Some(7),
        b'a' => Some(9),
        b'b' => Some(11),
        _ => None,
    }
}
