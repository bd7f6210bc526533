//! The playback-engine seam.
//!
//! `PlaybackEngine` is everything the session needs from a media backend:
//! transport primitives plus time/volume/rate queries. Queries never fail;
//! an engine with nothing loaded reports zeros.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("media file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("no media loaded")]
    NoMedia,
}

pub trait PlaybackEngine {
    /// Load `path`, replacing any current media. Playback does not start.
    fn open(&mut self, path: &Path) -> Result<(), EngineError>;
    /// Start or resume. After `stop` this restarts from the beginning.
    fn play(&mut self) -> Result<(), EngineError>;
    fn pause(&mut self) -> Result<(), EngineError>;
    fn stop(&mut self) -> Result<(), EngineError>;
    /// Seek to a fraction (0..=1) of the media length.
    fn set_position(&mut self, fraction: f64) -> Result<(), EngineError>;
    /// Current position as a fraction (0..=1) of the media length.
    fn position(&self) -> f64;
    /// Seek to an absolute time.
    fn set_time_ms(&mut self, ms: u64) -> Result<(), EngineError>;
    /// Volume in percent (0..=100).
    fn set_volume(&mut self, volume: u8) -> Result<(), EngineError>;
    fn volume(&self) -> u8;
    /// Playback speed multiplier (1.0 = normal).
    fn set_rate(&mut self, rate: f32) -> Result<(), EngineError>;
    fn rate(&self) -> f32;
    fn is_playing(&self) -> bool;
    fn time_ms(&self) -> u64;
    /// Media length, or 0 when unknown.
    fn length_ms(&self) -> u64;
    /// Drop the current media and any output resources tied to it.
    fn release(&mut self);
}
