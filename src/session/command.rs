use std::path::PathBuf;

/// Every input the session accepts, from keys, MPRIS or startup arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Load and start a media file.
    Open(PathBuf),
    /// Scan a directory into the playlist.
    OpenFolder(PathBuf),
    /// Load the playlist item at the given index.
    PlayItem(usize),
    Play,
    Pause,
    PlayPause,
    Stop,
    /// Seek to a fraction of the duration; clamped to 0..=1.
    Seek(f64),
    /// Seek relative to the current time, in milliseconds.
    SeekBy(i64),
    /// Set the volume in percent; clamped to 0..=100.
    SetVolume(i32),
    VolumeUp,
    VolumeDown,
    /// Set the playback rate; clamped to the configured range.
    SetRate(f32),
    /// Select one of the configured rate presets by index.
    RatePreset(usize),
    Next,
    Prev,
    /// Add the current file to favorites.
    AddFavorite,
    RemoveFavorite(String),
    ClearHistory,
    Quit,
}

/// What the caller should do after a dispatched command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}
