use rtttl_player::{AudioOutput, MelodyPlayer, Waveform};
use std::time::{Duration, Instant};

// How often the host polls the sequencer. Well under the shortest
// practical note (a 32nd at fast tempos is ~30ms), so note boundaries
// land within a millisecond or two of their nominal time.
const TICK_INTERVAL: Duration = Duration::from_millis(5);

const DEMO_MELODY: &str =
    "Demo:d=8,o=5,b=140:c,e,g,c6,4p,c6,g,e,4c,4p,16c,16c#,16d,16d#,4e.,2p,2a4";

fn main() {
    println!("=== rtttl_player demo ===\n");

    let melody = std::env::args().nth(1).unwrap_or_else(|| {
        println!("No melody given, playing the built-in demo");
        DEMO_MELODY.to_string()
    });

    let audio = match AudioOutput::new(Waveform::Square) {
        Ok(audio) => audio,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return;
        }
    };
    println!("Audio device ready at {} Hz", audio.sample_rate());

    let mut player = MelodyPlayer::new(Box::new(audio.handle()));
    player.add_on_finished(Box::new(|| println!("Playback finished")));

    let start = Instant::now();
    player.play(&melody, 0);
    println!("Playing...");

    // The scheduler pass lives here in the host; the player itself
    // never sleeps.
    while player.is_playing() {
        std::thread::sleep(TICK_INTERVAL);
        player.tick(start.elapsed().as_millis() as u64);
    }
}
