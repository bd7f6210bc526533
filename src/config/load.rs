use std::{env, path::PathBuf};

use super::schema::{Settings, StorageSettings};

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `REPLAY__`) on top, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("REPLAY")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.ui.tick_ms == 0 {
            return Err("ui.tick_ms must be >= 1".to_string());
        }
        let p = &self.playback;
        if !(p.min_rate.is_finite() && p.min_rate > 0.0) {
            return Err("playback.min_rate must be a positive number".to_string());
        }
        if !p.max_rate.is_finite() || p.max_rate < p.min_rate {
            return Err("playback.max_rate must be >= playback.min_rate".to_string());
        }
        if p.default_volume > 100 {
            return Err("playback.default_volume must be within 0..=100".to_string());
        }
        if p.rate_presets.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
            return Err("playback.rate_presets must all be positive".to_string());
        }
        Ok(())
    }
}

impl StorageSettings {
    /// Directory the persisted files live in.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn history_path(&self) -> PathBuf {
        self.resolved_data_dir().join(&self.history_file)
    }

    pub fn favorites_path(&self) -> PathBuf {
        self.resolved_data_dir().join(&self.favorites_file)
    }

    pub fn state_path(&self) -> PathBuf {
        self.resolved_data_dir().join(&self.state_file)
    }
}

/// Resolve the config path from `REPLAY_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("REPLAY_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/replay/config.toml`
/// or `~/.config/replay/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("replay").join("config.toml"))
}

/// Compute the default data directory `$XDG_DATA_HOME/replay` or
/// `~/.local/share/replay`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("replay"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
