use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{Span, info_span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config;
use crate::engine::{EngineError, PlaybackEngine, RodioEngine};
use crate::library::MediaLibrary;
use crate::session::SessionController;
use crate::store;

/// What survives between runs besides history and favorites.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UiState {
    pub volume: u8,
    #[serde(default)]
    pub last_directory: Option<PathBuf>,
}

/// Where the log file goes: absolute as configured, else inside the data dir.
pub fn log_path(settings: &config::Settings) -> PathBuf {
    let file = &settings.logging.file;
    if file.is_absolute() {
        file.clone()
    } else {
        settings.storage.resolved_data_dir().join(file)
    }
}

/// Install the global subscriber, writing to the log file.
///
/// `RUST_LOG` takes precedence over `logging.filter`. The returned guard
/// flushes pending lines when dropped.
pub fn init_logging(settings: &config::Settings) -> Result<WorkerGuard, Box<dyn Error>> {
    let path = log_path(settings);
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("log path has no file name: {}", path.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok(guard)
}

/// Restore the saved UI state, or start from the configured volume.
pub fn load_ui_state(path: &Path, settings: &config::Settings, span: &Span) -> UiState {
    let saved: Option<UiState> = store::load_or_default(path, span);
    saved.unwrap_or_else(|| UiState {
        volume: settings.playback.default_volume,
        last_directory: None,
    })
}

pub fn save_ui_state(path: &Path, state: &UiState, span: &Span) {
    store::save_or_log(path, state, span);
}

/// Save the UI state and shut the session down. Called before the terminal
/// is restored, so a failed restore still leaves the state on disk.
pub fn close_session<E: PlaybackEngine>(
    controller: &mut SessionController<E>,
    app: &App,
    state_path: &Path,
    span: &Span,
) {
    let state = UiState {
        volume: controller.session().volume,
        last_directory: app.last_directory.clone(),
    };
    save_ui_state(state_path, &state, span);
    controller.shutdown();
}

/// Open the audio output and the library, and wire them into a controller.
pub fn build_controller(
    settings: &config::Settings,
    root: &Span,
) -> Result<SessionController<RodioEngine>, EngineError> {
    let engine = RodioEngine::new(info_span!(parent: root, "engine"))?;
    let library = MediaLibrary::open(
        &settings.storage.history_path(),
        &settings.storage.favorites_path(),
        settings.history.dedupe,
        info_span!(parent: root, "library"),
    );
    Ok(SessionController::new(
        engine,
        library,
        settings.playback.clone(),
        settings.library.clone(),
        info_span!(parent: root, "session"),
    ))
}
