// Tone output - the continuous frequency/level collaborator
// The sequencer only ever talks to this seam

/// Continuous-amplitude output device: a PWM channel, a DAC, a synth
/// voice. One call commits the frequency and the level together, so the
/// listener never observes a half-updated pair; level 0 silences the
/// output regardless of frequency.
pub trait ToneOutput {
    fn write(&mut self, frequency_hz: f32, level: f32);
}

/// Output that goes nowhere, for headless hosts and dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

impl ToneOutput for NullOutput {
    fn write(&mut self, _frequency_hz: f32, _level: f32) {}
}
