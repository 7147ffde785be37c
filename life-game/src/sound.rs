/// Fire-and-forget audio cues queued by the game for the front end to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Click,
    Step,
    Clear,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Click => "click",
            SoundCue::Step => "step",
            SoundCue::Clear => "clear",
        }
    }
}
