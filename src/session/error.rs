use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

/// Failures the session reports back to the user.
///
/// Engine failures outside of loading are logged and swallowed instead.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Could not load {}: {source}", path.display())]
    MediaLoad {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },
}
