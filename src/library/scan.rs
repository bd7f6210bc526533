use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::MediaFile;

pub(crate) fn is_media_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Container duration when `lofty` understands the format (mp4/mov do).
pub fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

/// List the media files under `dir`, sorted by title (case-insensitive).
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<MediaFile> {
    let mut files: Vec<MediaFile> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() && is_media_file(path, settings) {
            let title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string();

            files.push(MediaFile {
                path: path.to_path_buf(),
                title,
                duration: probe_duration(path),
            });
        }
    }

    files.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    files
}
