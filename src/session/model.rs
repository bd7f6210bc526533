//! Session model types: `PlaybackSession` and `PlaybackState`.

use std::path::PathBuf;

use crate::library::format_time_code;

/// The transport state of the session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The currently loaded media and its transport state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub current_file: Option<PathBuf>,
    pub state: PlaybackState,
    pub position_ms: u64,
    /// Media length, 0 while unknown.
    pub duration_ms: u64,
    /// Percent, 0..=100.
    pub volume: u8,
    /// Speed multiplier, always > 0.
    pub rate: f32,
}

impl PlaybackSession {
    pub fn new(volume: u8) -> Self {
        Self {
            current_file: None,
            state: PlaybackState::Stopped,
            position_ms: 0,
            duration_ms: 0,
            volume: volume.min(100),
            rate: 1.0,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current_file.is_some()
    }

    /// Position as a fraction of the duration (0 when unknown).
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
        }
    }

    /// `elapsed / total`, e.g. `01:05 / 42:10`.
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_time_code(self.position_ms),
            format_time_code(self.duration_ms)
        )
    }

    /// File name of the current media, without directories.
    pub fn file_name(&self) -> Option<String> {
        self.current_file.as_ref().map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
    }

    pub(super) fn reset_transport(&mut self) {
        self.state = PlaybackState::Stopped;
        self.position_ms = 0;
    }
}
