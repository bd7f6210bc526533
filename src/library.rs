//! Watch history, favorites and folder playlists.
//!
//! `MediaLibrary` mirrors the history and favorites JSON files in memory;
//! `scan` turns a directory into the `MediaFile` list behind a `Playlist`.

mod manager;
mod model;
mod playlist;
mod scan;

pub use manager::MediaLibrary;
pub use model::{HistoryEntry, MediaFile, format_time_code};
pub use playlist::Playlist;
pub use scan::{probe_duration, scan};

#[cfg(test)]
mod tests;
