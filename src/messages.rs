use crate::fetch::LoadOutcome;
use crate::playlist::Audio;

/// Events published by the player store and the lyric loader
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// The current song changed
    ListSwitch(Audio),
    /// The playlist contents changed
    ListChange(Vec<Audio>),
    /// A lyric load finished and was still the latest request
    LyricsLoaded { generation: u64, outcome: LoadOutcome },
}

/// Media notifications, named after the element events they mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Play,
    Pause,
    Seeked,
    TimeUpdate,
    VolumeChange,
    Ended,
}

impl MediaEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MediaEvent::Play => "play",
            MediaEvent::Pause => "pause",
            MediaEvent::Seeked => "seeked",
            MediaEvent::TimeUpdate => "timeupdate",
            MediaEvent::VolumeChange => "volumechange",
            MediaEvent::Ended => "ended",
        }
    }
}
