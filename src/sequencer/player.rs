// Melody player - non-blocking RTTTL playback state machine
// Re-entered on every scheduler pass; owns the cursor and the clock math

use crate::melody::header::MelodyHeader;
use crate::melody::pitch::note_frequency;
use crate::melody::tokenizer::next_token;
use crate::output::ToneOutput;

/// Silence reserved at the tail of each audible note so consecutive
/// notes, identical or not, stay perceptibly separate.
pub const STACCATO_GAP_MS: u32 = 10;

/// Volume used when the host never configures one.
const DEFAULT_VOLUME_LEVEL: f32 = 0.5;

/// Listener invoked when a melody reaches its natural end.
pub type FinishedCallback = Box<dyn FnMut() + Send>;

/// Playback state: the "is playing" flag and the per-note data it
/// guards live in one place, so the flag can never disagree with the
/// data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    /// No melody armed.
    Idle,
    /// Stepping through notes.
    Playing {
        /// Absolute clock value at which the current note's window ends
        end_time_ms: u64,
        /// Output frequency (0 for a rest)
        frequency_hz: f32,
        /// Commanded output level
        level: f32,
    },
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing { .. })
    }
}

/// Non-blocking RTTTL melody player.
///
/// The host calls [`tick`](MelodyPlayer::tick) on every scheduler pass
/// with a monotonic millisecond clock. The player compares it against
/// the current note's end time and, once the window has elapsed, scans
/// exactly one more token, commits its frequency and level to the
/// output, and re-arms the end time. It never sleeps, never reads a
/// clock of its own, and allocates nothing while ticking.
pub struct MelodyPlayer {
    output: Box<dyn ToneOutput + Send>,
    melody: String,
    cursor: usize,
    header: MelodyHeader,
    state: PlaybackState,
    volume_level: f32,
    default_volume_level: f32,
    on_finished: Vec<FinishedCallback>,
}

impl MelodyPlayer {
    pub fn new(output: Box<dyn ToneOutput + Send>) -> Self {
        Self {
            output,
            melody: String::new(),
            cursor: 0,
            header: MelodyHeader::default(),
            state: PlaybackState::Idle,
            volume_level: 0.0,
            default_volume_level: DEFAULT_VOLUME_LEVEL,
            on_finished: Vec::new(),
        }
    }

    /// Configure the volume used by [`play`](MelodyPlayer::play).
    pub fn with_default_volume_level(mut self, level: f32) -> Self {
        self.set_default_volume_level(level);
        self
    }

    /// Start a melody at the configured default volume level.
    pub fn play(&mut self, melody: &str, now_ms: u64) {
        self.play_with_level(melody, self.default_volume_level, now_ms);
    }

    /// Start a melody at an explicit volume level in [0, 1].
    ///
    /// Unconditionally preempts a melody already playing: the old
    /// cursor is discarded, nothing is queued, and nothing errors. The
    /// first note is parsed and committed to the output right here
    /// rather than on the next tick; a header-only melody arms an empty
    /// window instead, so the first tick observes the exhausted cursor
    /// and finishes.
    pub fn play_with_level(&mut self, melody: &str, level: f32, now_ms: u64) {
        self.melody.clear();
        self.melody.push_str(melody);
        let (header, cursor) = MelodyHeader::parse(&self.melody);
        self.header = header;
        self.cursor = cursor;
        self.volume_level = level.clamp(0.0, 1.0);

        if self.cursor >= self.melody.len() {
            self.state = PlaybackState::Playing {
                end_time_ms: now_ms,
                frequency_hz: 0.0,
                level: 0.0,
            };
        } else {
            self.advance(now_ms);
        }
    }

    /// Silence the output and drop the current melody.
    ///
    /// Idempotent, and never fires the finished callbacks; those are
    /// reserved for a natural end of playback.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Idle;
        self.melody.clear();
        self.cursor = 0;
        self.output.write(0.0, 0.0);
    }

    /// One scheduler pass. Cheap no-op while idle or while the current
    /// note's window is still open; parses at most one note otherwise.
    pub fn tick(&mut self, now_ms: u64) {
        match self.state {
            PlaybackState::Idle => {}
            PlaybackState::Playing { end_time_ms, .. } => {
                if now_ms >= end_time_ms {
                    self.advance(now_ms);
                }
            }
        }
    }

    /// True while a melody is armed; a rest still counts as playing.
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Volume used when the caller does not pick one.
    pub fn default_volume_level(&self) -> f32 {
        self.default_volume_level
    }

    pub fn set_default_volume_level(&mut self, level: f32) {
        self.default_volume_level = level.clamp(0.0, 1.0);
    }

    /// Register a listener for the natural end of playback. Every
    /// listener fires exactly once per finished melody; an explicit
    /// [`stop`](MelodyPlayer::stop) fires none of them.
    pub fn add_on_finished(&mut self, callback: FinishedCallback) {
        self.on_finished.push(callback);
    }

    /// Step past the current note: arm the next token, or finish the
    /// melody when the cursor has exhausted the string.
    fn advance(&mut self, now_ms: u64) {
        if self.cursor >= self.melody.len() {
            self.state = PlaybackState::Idle;
            self.output.write(0.0, 0.0);
            for callback in &mut self.on_finished {
                callback();
            }
            return;
        }

        let (token, cursor) = next_token(&self.melody, self.cursor);
        self.cursor = cursor;

        let duration_ms = token.duration_ms(&self.header);
        let (frequency_hz, level, window_ms) = match token.semitone {
            Some(semitone) => {
                let frequency =
                    note_frequency(semitone, token.octave_or_default(&self.header));
                // Give the tail of the note up as a staccato gap, unless
                // the note is too short to afford one.
                let audible = duration_ms.saturating_sub(STACCATO_GAP_MS);
                let audible = if audible == 0 { duration_ms } else { audible };
                (frequency, self.volume_level, audible)
            }
            // A rest keeps its full window so melody timing stays intact.
            None => (0.0, 0.0, duration_ms),
        };

        self.output.write(frequency_hz, level);
        self.state = PlaybackState::Playing {
            end_time_ms: now_ms + u64::from(window_ms),
            frequency_hz,
            level,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::NullOutput;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records every (frequency, level) pair committed to the output.
    #[derive(Clone, Default)]
    struct RecordingOutput {
        writes: Arc<Mutex<Vec<(f32, f32)>>>,
    }

    impl RecordingOutput {
        fn writes(&self) -> Vec<(f32, f32)> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl ToneOutput for RecordingOutput {
        fn write(&mut self, frequency_hz: f32, level: f32) {
            self.writes.lock().unwrap().push((frequency_hz, level));
        }
    }

    fn player_with_recorder() -> (MelodyPlayer, RecordingOutput) {
        let recorder = RecordingOutput::default();
        let player = MelodyPlayer::new(Box::new(recorder.clone()));
        (player, recorder)
    }

    fn end_time(player: &MelodyPlayer) -> u64 {
        match player.state() {
            PlaybackState::Playing { end_time_ms, .. } => end_time_ms,
            PlaybackState::Idle => panic!("expected a playing state"),
        }
    }

    #[test]
    fn test_reference_melody_timeline() {
        let (mut player, recorder) = player_with_recorder();

        // 120 BPM: whole note 2000ms, quarter 500ms, eighth 250ms
        player.play_with_level("Test:d=4,o=5,b=120:c,8e,g5", 0.8, 0);

        // First note committed during play: c5, 500 - 10 = 490ms window
        assert!(player.is_playing());
        assert_eq!(end_time(&player), 490);

        // Still inside the window: nothing changes
        player.tick(489);
        assert_eq!(end_time(&player), 490);
        assert_eq!(recorder.writes().len(), 1);

        // e5 with explicit eighth code: 250 - 10 = 240ms
        player.tick(490);
        assert_eq!(end_time(&player), 490 + 240);

        // g5 back on the default quarter
        player.tick(730);
        assert_eq!(end_time(&player), 730 + 490);

        // Cursor exhausted: silence and idle
        player.tick(1220);
        assert!(!player.is_playing());

        let writes = recorder.writes();
        assert_eq!(writes.len(), 4);
        assert!((writes[0].0 - 523.26).abs() < 0.5); // c5
        assert!((writes[1].0 - 659.26).abs() < 0.5); // e5
        assert!((writes[2].0 - 784.0).abs() < 0.5); // g5
        assert_eq!(writes[3], (0.0, 0.0));
        for write in &writes[..3] {
            assert_eq!(write.1, 0.8);
        }
    }

    #[test]
    fn test_rest_holds_full_window_at_zero_level() {
        let (mut player, recorder) = player_with_recorder();

        player.play_with_level("R:d=4,b=120:c,p,c", 1.0, 0);
        player.tick(490);

        // The rest: zero frequency, zero level, full 500ms
        let writes = recorder.writes();
        assert_eq!(writes[1], (0.0, 0.0));
        assert_eq!(end_time(&player), 490 + 500);

        player.tick(990);
        assert!(player.is_playing());
        player.tick(990 + 490);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_dotted_note_extends_by_half() {
        let (mut player, _) = player_with_recorder();

        player.play_with_level("D:d=4,o=5,b=120:c.", 0.5, 100);

        // 500 * 1.5 = 750ms parsed, minus the 10ms gap
        assert_eq!(end_time(&player), 100 + 740);
    }

    #[test]
    fn test_gap_guard_keeps_short_notes_audible() {
        let (mut player, _) = player_with_recorder();

        // b=750: whole note 320ms, 32nd note = 10ms, equal to the gap
        player.play_with_level("S:b=750:32c", 0.5, 0);

        // Subtraction would hit zero, so the full duration is used
        assert_eq!(end_time(&player), 10);
    }

    #[test]
    fn test_stop_is_idempotent_and_silences() {
        let (mut player, recorder) = player_with_recorder();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);
        player.add_on_finished(Box::new(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        }));

        player.play_with_level("Test:d=4,b=120:c,e,g", 0.7, 0);
        player.stop();

        assert!(!player.is_playing());
        assert_eq!(*recorder.writes().last().unwrap(), (0.0, 0.0));
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Second stop changes nothing but another silence write
        player.stop();
        assert!(!player.is_playing());
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Ticking after stop is a no-op
        let writes_before = recorder.writes().len();
        player.tick(10_000);
        assert_eq!(recorder.writes().len(), writes_before);
    }

    #[test]
    fn test_finished_fires_exactly_once() {
        let (mut player, _) = player_with_recorder();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);
        player.add_on_finished(Box::new(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        }));

        player.play_with_level("T:d=4,b=120:c", 0.5, 0);
        player.tick(490);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Idle ticks never re-fire
        player.tick(1000);
        player.tick(2000);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replay_preempts_without_blending() {
        let (mut player, recorder) = player_with_recorder();

        player.play_with_level("One:d=4,b=120:c,e,g,c,e,g", 0.5, 0);
        player.tick(490); // into the second note

        // Preempt mid-melody; the new melody starts from its own first note
        player.play_with_level("Two:d=4,o=4,b=120:a", 0.5, 500);
        assert_eq!(end_time(&player), 500 + 490);
        assert!((recorder.writes().last().unwrap().0 - 440.0).abs() < 0.5);

        player.tick(990);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_header_only_melody_finishes_on_first_tick() {
        let (mut player, recorder) = player_with_recorder();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);
        player.add_on_finished(Box::new(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        }));

        player.play_with_level("T:d=4:", 0.5, 0);

        // Play itself commits nothing for an empty notes section
        assert!(player.is_playing());
        assert!(recorder.writes().is_empty());

        player.tick(1);
        assert!(!player.is_playing());
        assert_eq!(recorder.writes(), vec![(0.0, 0.0)]);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_volume_level() {
        let mut player = MelodyPlayer::new(Box::new(NullOutput)).with_default_volume_level(0.3);
        assert_eq!(player.default_volume_level(), 0.3);

        player.play("T:d=4,b=120:c", 0);
        match player.state() {
            PlaybackState::Playing { level, .. } => assert_eq!(level, 0.3),
            PlaybackState::Idle => panic!("expected a playing state"),
        }
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut player = MelodyPlayer::new(Box::new(NullOutput));
        player.play_with_level("T:d=4,b=120:c", 7.0, 0);

        match player.state() {
            PlaybackState::Playing { level, .. } => assert_eq!(level, 1.0),
            PlaybackState::Idle => panic!("expected a playing state"),
        }
    }
}
