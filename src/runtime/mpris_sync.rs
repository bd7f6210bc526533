use std::path::PathBuf;

use crate::mpris::MprisHandle;
use crate::session::{PlaybackSession, PlaybackState};

/// The parts of the session MPRIS publishes, used to skip redundant updates.
#[derive(Debug, Clone, PartialEq)]
pub struct MprisSnapshot {
    state: PlaybackState,
    file: Option<PathBuf>,
    duration_ms: u64,
    position_ms: u64,
    volume: u8,
    rate: f32,
}

impl MprisSnapshot {
    pub fn of(session: &PlaybackSession) -> Self {
        Self {
            state: session.state,
            file: session.current_file.clone(),
            duration_ms: session.duration_ms,
            position_ms: session.position_ms,
            volume: session.volume,
            rate: session.rate,
        }
    }
}

pub fn update_mpris(mpris: &MprisHandle, session: &PlaybackSession) {
    let title = session.file_name();
    let track = match (title.as_deref(), session.current_file.as_deref()) {
        (Some(title), Some(path)) => Some((title, path, session.duration_ms)),
        _ => None,
    };
    mpris.set_track(track);
    mpris.set_levels(session.position_ms, session.volume, session.rate);
    mpris.set_playback(session.state);
}
