//! Media playback backends.
//!
//! The session talks to a `PlaybackEngine`; `RodioEngine` is the shipped
//! implementation and plays the audio track of a media file.

mod output;
mod sink;
mod types;

pub use output::RodioEngine;
pub use types::{EngineError, PlaybackEngine};

#[cfg(test)]
pub(crate) mod fake;
