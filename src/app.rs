//! Application module: the view model the TUI draws from.
//!
//! `App` holds what only the terminal front end cares about: which panel
//! has focus, the selection in each panel, the open prompt and the error
//! popup. Playback state lives in `session`.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
