//! Playback session: the state machine between the UI and the engine.
//!
//! `SessionController` owns the `PlaybackSession`, the watch history and the
//! folder playlist. Key presses, MPRIS calls and startup arguments all reach
//! it as `Command`s through `SessionController::dispatch`.

mod command;
mod controller;
mod error;
mod model;

pub use command::{Command, Flow};
pub use controller::SessionController;
pub use error::SessionError;
pub use model::{PlaybackSession, PlaybackState};
