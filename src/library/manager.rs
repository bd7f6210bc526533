use std::path::{Path, PathBuf};

use tracing::{Span, debug, info};

use crate::config::HistoryDedupe;
use crate::store;

use super::model::HistoryEntry;

/// Watch history and favorites, mirrored from their JSON files.
///
/// Every mutation rewrites the affected file before returning.
#[derive(Debug)]
pub struct MediaLibrary {
    history: Vec<HistoryEntry>,
    favorites: Vec<String>,
    history_path: PathBuf,
    favorites_path: PathBuf,
    dedupe: HistoryDedupe,
    span: Span,
}

impl MediaLibrary {
    /// Load both lists. Missing or unreadable files start out empty.
    pub fn open(history_path: &Path, favorites_path: &Path, dedupe: HistoryDedupe, span: Span) -> Self {
        let history: Vec<HistoryEntry> = store::load_or_default(history_path, &span);
        let mut favorites: Vec<String> = store::load_or_default(favorites_path, &span);

        // A hand-edited file may repeat names; keep the first occurrence.
        let before = favorites.len();
        let mut seen = std::collections::HashSet::new();
        favorites.retain(|f| seen.insert(f.clone()));
        if favorites.len() != before {
            debug!(parent: &span, dropped = before - favorites.len(), "dropped duplicate favorites");
        }

        info!(
            parent: &span,
            history = history.len(),
            favorites = favorites.len(),
            "library opened"
        );

        Self {
            history,
            favorites,
            history_path: history_path.to_path_buf(),
            favorites_path: favorites_path.to_path_buf(),
            dedupe,
            span,
        }
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|f| f == name)
    }

    /// Append `entry` and persist, unless the dedupe policy rejects it.
    pub fn add_history(&mut self, entry: HistoryEntry) -> bool {
        let duplicate = match self.dedupe {
            HistoryDedupe::None => false,
            HistoryDedupe::Path => self.history.iter().any(|h| h.path == entry.path),
            HistoryDedupe::PathAndTimeCode => self
                .history
                .iter()
                .any(|h| h.path == entry.path && h.time_code == entry.time_code),
        };
        if duplicate {
            debug!(parent: &self.span, path = %entry.path, "already in history");
            return false;
        }

        debug!(parent: &self.span, path = %entry.path, "recording history entry");
        self.history.push(entry);
        self.save_history();
        true
    }

    /// Insert `name` if absent and persist. Returns whether it was added.
    pub fn add_favorite(&mut self, name: &str) -> bool {
        if self.is_favorite(name) {
            return false;
        }
        self.favorites.push(name.to_string());
        info!(parent: &self.span, name, "added favorite");
        self.save_favorites();
        true
    }

    /// Remove `name` if present and persist. Returns whether it was removed.
    pub fn remove_favorite(&mut self, name: &str) -> bool {
        let Some(pos) = self.favorites.iter().position(|f| f == name) else {
            return false;
        };
        self.favorites.remove(pos);
        info!(parent: &self.span, name, "removed favorite");
        self.save_favorites();
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        info!(parent: &self.span, "history cleared");
        self.save_history();
    }

    fn save_history(&self) {
        store::save_or_log(&self.history_path, &self.history, &self.span);
    }

    fn save_favorites(&self) {
        store::save_or_log(&self.favorites_path, &self.favorites, &self.span);
    }
}
