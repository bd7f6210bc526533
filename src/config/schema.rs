use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/replay/config.toml` or `~/.config/replay/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `REPLAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub playback: PlaybackSettings,
    pub history: HistorySettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the history, favorites and state files.
    ///
    /// When unset: `$XDG_DATA_HOME/replay` or `~/.local/share/replay`.
    pub data_dir: Option<PathBuf>,
    pub history_file: String,
    pub favorites_file: String,
    /// Volume and last opened directory, restored on the next start.
    pub state_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_file: "history.json".to_string(),
            favorites_file: "favorites.json".to_string(),
            state_file: "state.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume used when no saved state exists (0-100).
    pub default_volume: u8,
    /// Step applied by the volume up/down keys.
    pub volume_step: u8,
    /// Number of seconds to jump when pressing the left/right arrows.
    pub seek_step_seconds: u64,
    /// Lowest accepted playback rate.
    pub min_rate: f32,
    /// Highest accepted playback rate.
    pub max_rate: f32,
    /// Rates bound to the number keys, in order (`1` selects the first).
    pub rate_presets: Vec<f32>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            default_volume: 50,
            volume_step: 5,
            seek_step_seconds: 10,
            min_rate: 0.25,
            max_rate: 4.0,
            rate_presets: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// How repeated loads of the same media are recorded.
    pub dedupe: HistoryDedupe,
}

/// Duplicate policy for watch-history entries.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryDedupe {
    /// Every successful load appends an entry.
    #[serde(alias = "off")]
    None,
    /// A path already present in history is not recorded again.
    #[default]
    #[serde(alias = "filename")]
    Path,
    /// Only an exact (path, time code) repeat is skipped.
    #[serde(alias = "path_and_time_code", alias = "filename-and-time-code")]
    PathAndTimeCode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Interval of the position/status refresh timer (milliseconds).
    pub tick_ms: u64,
    /// The text rendered in the header when nothing is loaded.
    pub header_text: String,
    /// Whether the favorites/history side panel starts visible.
    pub show_side_panel: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            header_text: " ~ replay ~ ".to_string(),
            show_side_panel: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as media (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp4".into(), "avi".into(), "mkv".into(), "mov".into()],
            follow_links: true,
            include_hidden: false,
            recursive: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file name, relative to the data directory unless absolute.
    pub file: PathBuf,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("replay.log"),
            filter: "info".to_string(),
        }
    }
}
