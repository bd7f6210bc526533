use super::scan::is_media_file;
use super::*;
use crate::config::{HistoryDedupe, LibrarySettings};
use crate::store;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};
use tracing::Span;

fn open_in(dir: &TempDir, dedupe: HistoryDedupe) -> MediaLibrary {
    MediaLibrary::open(
        &dir.path().join("history.json"),
        &dir.path().join("favorites.json"),
        dedupe,
        Span::none(),
    )
}

fn entry(path: &str, time_ms: u64) -> HistoryEntry {
    HistoryEntry::new(path, time_ms, Some(100_000), Some(50))
}

#[test]
fn format_time_code_switches_to_hours() {
    assert_eq!(format_time_code(0), "00:00");
    assert_eq!(format_time_code(61_999), "01:01");
    assert_eq!(format_time_code(3_599_000), "59:59");
    assert_eq!(format_time_code(3_600_000), "01:00:00");
    assert_eq!(format_time_code(36_125_000), "10:02:05");
}

#[test]
fn missing_files_open_empty() {
    let dir = tempdir().unwrap();
    let lib = open_in(&dir, HistoryDedupe::Path);
    assert!(lib.history().is_empty());
    assert!(lib.favorites().is_empty());
}

#[test]
fn corrupt_files_open_empty() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("history.json"), "{{{{").unwrap();
    fs::write(dir.path().join("favorites.json"), "[1, 2").unwrap();

    let lib = open_in(&dir, HistoryDedupe::Path);
    assert!(lib.history().is_empty());
    assert!(lib.favorites().is_empty());
}

#[test]
fn favorites_are_unique_and_persisted() {
    let dir = tempdir().unwrap();
    let mut lib = open_in(&dir, HistoryDedupe::Path);

    assert!(lib.add_favorite("a.mp4"));
    assert!(!lib.add_favorite("a.mp4"));
    assert!(lib.add_favorite("b.mp4"));
    assert_eq!(lib.favorites(), ["a.mp4".to_string(), "b.mp4".to_string()]);

    let on_disk: Vec<String> = store::read_json(&dir.path().join("favorites.json")).unwrap();
    assert_eq!(on_disk, vec!["a.mp4".to_string(), "b.mp4".to_string()]);
}

#[test]
fn removing_a_non_member_does_not_touch_the_file() {
    let dir = tempdir().unwrap();
    let mut lib = open_in(&dir, HistoryDedupe::Path);

    assert!(!lib.remove_favorite("ghost.mp4"));
    assert!(!dir.path().join("favorites.json").exists());

    lib.add_favorite("a.mp4");
    assert!(!lib.remove_favorite("ghost.mp4"));
    assert_eq!(lib.favorites(), ["a.mp4".to_string()]);
    assert!(lib.remove_favorite("a.mp4"));
    assert!(lib.favorites().is_empty());

    let on_disk: Vec<String> = store::read_json(&dir.path().join("favorites.json")).unwrap();
    assert!(on_disk.is_empty());
}

#[test]
fn duplicate_favorites_on_disk_are_collapsed() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("favorites.json"),
        r#"["a.mp4", "b.mp4", "a.mp4"]"#,
    )
    .unwrap();

    let lib = open_in(&dir, HistoryDedupe::Path);
    assert_eq!(lib.favorites(), ["a.mp4".to_string(), "b.mp4".to_string()]);
}

#[test]
fn history_round_trips_in_insertion_order() {
    let dir = tempdir().unwrap();
    let mut lib = open_in(&dir, HistoryDedupe::None);
    lib.add_history(entry("c.mkv", 0));
    lib.add_history(entry("a.mp4", 1_000));
    lib.add_history(entry("b.avi", 2_000));
    let expected = lib.history().to_vec();

    let reopened = open_in(&dir, HistoryDedupe::None);
    assert_eq!(reopened.history(), expected.as_slice());
    let paths: Vec<&str> = reopened.history().iter().map(|h| h.path.as_str()).collect();
    assert_eq!(paths, vec!["c.mkv", "a.mp4", "b.avi"]);
}

#[test]
fn dedupe_policies_differ_on_replays() {
    let dir = tempdir().unwrap();

    let mut by_path = open_in(&dir, HistoryDedupe::Path);
    assert!(by_path.add_history(entry("a.mp4", 0)));
    assert!(!by_path.add_history(entry("a.mp4", 5_000)));
    assert_eq!(by_path.history().len(), 1);
    by_path.clear_history();

    let mut by_pair = open_in(&dir, HistoryDedupe::PathAndTimeCode);
    assert!(by_pair.history().is_empty());
    assert!(by_pair.add_history(entry("a.mp4", 0)));
    assert!(!by_pair.add_history(entry("a.mp4", 0)));
    assert!(by_pair.add_history(entry("a.mp4", 5_000)));
    assert_eq!(by_pair.history().len(), 2);
    by_pair.clear_history();

    let mut none = open_in(&dir, HistoryDedupe::None);
    assert!(none.add_history(entry("a.mp4", 0)));
    assert!(none.add_history(entry("a.mp4", 0)));
    assert_eq!(none.history().len(), 2);
}

#[test]
fn clear_history_persists_empty_list() {
    let dir = tempdir().unwrap();
    let mut lib = open_in(&dir, HistoryDedupe::Path);
    lib.add_history(entry("a.mp4", 0));
    lib.clear_history();

    let on_disk: Vec<HistoryEntry> = store::read_json(&dir.path().join("history.json")).unwrap();
    assert!(on_disk.is_empty());
}

#[test]
fn legacy_history_keys_are_accepted() {
    let json = r#"[
        {"filename": "old.mp4", "time_code": "01:02"},
        {"path": "new.mp4", "timestamp": 65000, "duration_ms": 90000, "volume": 40,
         "date_added": "2024-01-01T00:00:00Z"}
    ]"#;
    let entries: Vec<HistoryEntry> = serde_json::from_str(json).unwrap();

    assert_eq!(entries[0].path, "old.mp4");
    assert_eq!(entries[0].time_code, "01:02");
    assert_eq!(entries[0].duration_ms, None);
    assert_eq!(entries[1].path, "new.mp4");
    assert_eq!(entries[1].time_code, "01:05");
    assert_eq!(entries[1].duration_ms, Some(90_000));
    assert_eq!(entries[1].volume, Some(40));
}

#[test]
fn history_written_by_the_old_player_keeps_its_duration() {
    let json = r#"[{"path": "a.mp4", "timestamp": "00:00", "duration": 90000,
        "volume": 50, "date_added": "2024-01-01T10:00:00.123456"}]"#;
    let entries: Vec<HistoryEntry> = serde_json::from_str(json).unwrap();

    assert_eq!(entries[0].time_code, "00:00");
    assert_eq!(entries[0].duration_ms, Some(90_000));
    assert_eq!(entries[0].volume, Some(50));
    assert_eq!(entries[0].date_added, "2024-01-01T10:00:00.123456");

    // Written back under the canonical key.
    let out = serde_json::to_string(&entries[0]).unwrap();
    assert!(out.contains("\"duration_ms\":90000"));
}

#[test]
fn odd_history_values_do_not_drop_the_file() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("history.json"),
        r#"[
            {"path": "keep.mp4", "timestamp": "01:00"},
            {"path": "b.mp4", "timestamp": 61500.7, "duration": -5, "volume": 150.0},
            {"path": "c.mp4", "timestamp": null, "duration": "long", "volume": true}
        ]"#,
    )
    .unwrap();

    let mut lib = open_in(&dir, HistoryDedupe::None);
    let h = lib.history();
    assert_eq!(h.len(), 3);
    assert_eq!(h[0].time_code, "01:00");
    assert_eq!(h[1].time_code, "01:01");
    assert_eq!(h[1].duration_ms, None);
    assert_eq!(h[1].volume, Some(100));
    assert_eq!(h[2].time_code, "");
    assert_eq!(h[2].duration_ms, None);
    assert_eq!(h[2].volume, None);

    // The next save keeps the good entry.
    lib.add_history(entry("new.mp4", 0));
    let on_disk: Vec<HistoryEntry> = store::read_json(&dir.path().join("history.json")).unwrap();
    assert_eq!(on_disk.len(), 4);
    assert!(on_disk.iter().any(|e| e.path == "keep.mp4" && e.time_code == "01:00"));
}

#[test]
fn new_entry_is_stamped_and_labelled() {
    let e = HistoryEntry::new("/v/a.mp4", 0, None, None);
    assert!(!e.date_added.is_empty());
    assert_eq!(e.label(), "/v/a.mp4 - 00:00");
}

#[test]
fn playlist_steps_without_wrapping() {
    let mut pl = Playlist::default();
    assert_eq!(pl.next_index(), None);

    pl.replace(
        ["a", "b", "c"]
            .iter()
            .map(|n| MediaFile {
                path: PathBuf::from(format!("/v/{n}.mp4")),
                title: n.to_string(),
                duration: None,
            })
            .collect(),
    );
    assert_eq!(pl.next_index(), Some(0));
    assert_eq!(pl.prev_index(), None);

    pl.sync_to(Path::new("/v/b.mp4"));
    assert_eq!(pl.current_index(), Some(1));
    assert_eq!(pl.next_index(), Some(2));
    assert_eq!(pl.prev_index(), Some(0));

    pl.sync_to(Path::new("/v/c.mp4"));
    assert_eq!(pl.next_index(), None);

    pl.sync_to(Path::new("/elsewhere.mp4"));
    assert_eq!(pl.current_index(), None);
}

#[test]
fn is_media_file_matches_configured_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    assert!(is_media_file(Path::new("/tmp/a.mp4"), &settings));
    assert!(is_media_file(Path::new("/tmp/a.MKV"), &settings));
    assert!(is_media_file(Path::new("/tmp/a.avi"), &settings));
    assert!(is_media_file(Path::new("/tmp/a.mov"), &settings));
    assert!(!is_media_file(Path::new("/tmp/a.txt"), &settings));
    assert!(!is_media_file(Path::new("/tmp/a"), &settings));

    let dotted = LibrarySettings {
        extensions: vec![".WebM".into(), "  ".into()],
        ..LibrarySettings::default()
    };
    assert!(is_media_file(Path::new("/tmp/a.webm"), &dotted));
    assert!(!is_media_file(Path::new("/tmp/a.mp4"), &dotted));
}

#[test]
fn scan_filters_non_media_and_sorts_by_title_case_insensitive() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("b.MP4"), b"not a real mp4").unwrap();
    fs::write(dir.path().join("A.mkv"), b"not a real mkv").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let files = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].title, "A");
    assert_eq!(files[1].title, "b");
    assert_eq!(files[0].duration, None);
}

#[test]
fn scan_skips_hidden_and_nested_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp4"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp4"), b"not real").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp4"), b"not real").unwrap();

    let files = scan(dir.path(), &LibrarySettings::default());
    let titles: Vec<&str> = files.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["visible"]);

    let settings = LibrarySettings {
        recursive: true,
        include_hidden: true,
        ..LibrarySettings::default()
    };
    let titles: Vec<String> = scan(dir.path(), &settings)
        .into_iter()
        .map(|f| f.title)
        .collect();
    assert_eq!(titles, vec![".hidden", "child", "visible"]);
}

#[test]
fn scan_respects_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp4"), b"not real").unwrap();
    fs::write(d1.join("one.mp4"), b"not real").unwrap();
    fs::write(d2.join("two.mp4"), b"not real").unwrap();

    // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
    let settings = LibrarySettings {
        recursive: true,
        max_depth: Some(2),
        ..LibrarySettings::default()
    };
    let names: Vec<String> = scan(dir.path(), &settings)
        .into_iter()
        .map(|f| f.title)
        .collect();
    assert!(names.contains(&"root".to_string()));
    assert!(names.contains(&"one".to_string()));
    assert!(!names.contains(&"two".to_string()));
}
