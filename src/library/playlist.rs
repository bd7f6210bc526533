use std::path::Path;

use super::model::MediaFile;

/// Files of the last opened folder and the position within them.
#[derive(Debug, Default)]
pub struct Playlist {
    items: Vec<MediaFile>,
    index: Option<usize>,
}

impl Playlist {
    /// Replace the contents; no item is current afterwards.
    pub fn replace(&mut self, items: Vec<MediaFile>) {
        self.items = items;
        self.index = None;
    }

    pub fn items(&self) -> &[MediaFile] {
        &self.items
    }

    pub fn get(&self, i: usize) -> Option<&MediaFile> {
        self.items.get(i)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    /// Point at the item for `path`, or at nothing when it is not listed.
    pub fn sync_to(&mut self, path: &Path) {
        self.index = self.items.iter().position(|m| m.path == path);
    }

    /// Index after the current one. Starts at the first item; does not wrap.
    pub fn next_index(&self) -> Option<usize> {
        match self.index {
            None if !self.items.is_empty() => Some(0),
            Some(i) if i + 1 < self.items.len() => Some(i + 1),
            _ => None,
        }
    }

    /// Index before the current one. Does not wrap.
    pub fn prev_index(&self) -> Option<usize> {
        match self.index {
            Some(i) if i > 0 => Some(i - 1),
            _ => None,
        }
    }
}
