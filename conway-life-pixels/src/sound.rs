use life_game::SoundCue;
use log::{debug, warn};
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::time::Duration;

/// Plays the game's sound cues as short synthesized tones. Without an audio
/// device the manager is disabled and drops every cue.
pub struct SoundManager {
    output: Option<AudioOutput>,
    played: u64,
}

impl SoundManager {
    pub fn new() -> Self {
        match AudioOutput::open() {
            Ok(output) => Self::with_output(Some(output)),
            Err(err) => {
                warn!("No audio output ({err}), sound disabled");
                Self::muted()
            }
        }
    }

    pub fn muted() -> Self {
        Self::with_output(None)
    }

    fn with_output(output: Option<AudioOutput>) -> Self {
        Self { output, played: 0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn play(&mut self, cue: SoundCue) {
        let Some(output) = &self.output else {
            return;
        };
        if output.play(cue) {
            debug!("Sound: {}", cue.name());
            self.played += 1;
        }
    }

    pub fn num_played(&self) -> u64 {
        self.played
    }
}

impl Default for SoundManager {
    fn default() -> Self {
        Self::new()
    }
}

struct AudioOutput {
    // Dropping the stream stops playback.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    fn open() -> Result<Self, rodio::StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    /// Starts the cue's tone without waiting for it. Returns false if no
    /// sink could be created.
    fn play(&self, cue: SoundCue) -> bool {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return false;
        };
        let (frequency, millis, volume) = tone(cue);
        sink.set_volume(volume);
        sink.append(SineWave::new(frequency).take_duration(Duration::from_millis(millis)));
        sink.detach();
        true
    }
}

/// Frequency in Hz, length in ms and volume of each cue's tone.
fn tone(cue: SoundCue) -> (f32, u64, f32) {
    match cue {
        SoundCue::Click => (880.0, 40, 0.3),
        SoundCue::Step => (440.0, 20, 0.1),
        SoundCue::Clear => (220.0, 150, 0.3),
    }
}
