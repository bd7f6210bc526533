use super::*;
use crate::library::HistoryEntry;
use crate::session::Command;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn favs() -> Vec<String> {
    vec!["a.mp4".into(), "b.mkv".into()]
}

#[test]
fn focus_cycles_through_all_panels() {
    let mut app = App::new(true, None);
    assert_eq!(app.focus, Panel::Favorites);
    app.cycle_focus();
    assert_eq!(app.focus, Panel::History);
    app.cycle_focus();
    assert_eq!(app.focus, Panel::Folder);
    app.cycle_focus();
    assert_eq!(app.focus, Panel::Favorites);
}

#[test]
fn selection_wraps_per_panel() {
    let mut app = App::new(true, None);
    app.select_prev(3);
    assert_eq!(app.selected(Panel::Favorites), 2);
    app.select_next(3);
    assert_eq!(app.selected(Panel::Favorites), 0);

    app.cycle_focus();
    app.select_next(5);
    assert_eq!(app.selected(Panel::History), 1);
    assert_eq!(app.selected(Panel::Favorites), 0);

    app.select_next(0);
    assert_eq!(app.selected(Panel::History), 0);
}

#[test]
fn clamp_selections_after_lists_shrink() {
    let mut app = App::new(true, None);
    app.select_prev(4);
    assert_eq!(app.selected(Panel::Favorites), 3);

    app.clamp_selections(PanelLens {
        favorites: 2,
        history: 0,
        folder: 0,
    });
    assert_eq!(app.selected(Panel::Favorites), 1);
    assert_eq!(app.selected(Panel::History), 0);
}

#[test]
fn activate_maps_panel_to_command() {
    let mut app = App::new(true, None);
    let history = vec![HistoryEntry::new("/v/old.avi", 0, None, None)];

    app.select_next(2);
    assert_eq!(
        app.activate(&favs(), &history, 0),
        Some(Command::Open(PathBuf::from("b.mkv")))
    );

    app.cycle_focus();
    assert_eq!(
        app.activate(&favs(), &history, 0),
        Some(Command::Open(PathBuf::from("/v/old.avi")))
    );

    app.cycle_focus();
    assert_eq!(app.activate(&favs(), &history, 0), None);
    assert_eq!(app.activate(&favs(), &history, 3), Some(Command::PlayItem(0)));
}

#[test]
fn selected_favorite_needs_focus() {
    let mut app = App::new(true, None);
    assert_eq!(app.selected_favorite(&favs()), Some("a.mp4"));
    app.cycle_focus();
    assert_eq!(app.selected_favorite(&favs()), None);
    assert_eq!(App::new(true, None).selected_favorite(&[]), None);
}

#[test]
fn prompt_prefills_last_directory() {
    let mut app = App::new(true, Some(PathBuf::from("/media/videos")));
    app.begin_prompt(InputMode::OpenFile);
    assert!(app.is_prompting());
    assert_eq!(app.input, "/media/videos/");

    for c in "clip.mp4".chars() {
        app.push_input(c);
    }
    assert_eq!(
        app.submit_prompt(),
        Some(Command::Open(PathBuf::from("/media/videos/clip.mp4")))
    );
    assert!(!app.is_prompting());
    assert!(app.input.is_empty());
}

#[test]
fn folder_prompt_and_editing() {
    let mut app = App::new(true, None);
    app.begin_prompt(InputMode::OpenFolder);
    assert!(app.input.is_empty());
    for c in "/tmpx".chars() {
        app.push_input(c);
    }
    app.pop_input();
    assert_eq!(
        app.submit_prompt(),
        Some(Command::OpenFolder(PathBuf::from("/tmp")))
    );
}

#[test]
fn blank_or_cancelled_prompt_yields_nothing() {
    let mut app = App::new(true, None);
    app.begin_prompt(InputMode::OpenFile);
    app.push_input(' ');
    assert_eq!(app.submit_prompt(), None);

    app.begin_prompt(InputMode::OpenFile);
    app.push_input('x');
    app.cancel_prompt();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.input.is_empty());
}

#[test]
fn error_popup_dismisses_once() {
    let mut app = App::new(true, None);
    assert!(!app.dismiss_error());
    app.show_error("Could not load a.mp4");
    assert_eq!(app.error.as_deref(), Some("Could not load a.mp4"));
    assert!(app.dismiss_error());
    assert!(app.error.is_none());
}

#[test]
fn remember_location_uses_parent_or_dir() {
    let dir = tempdir().unwrap();
    let mut app = App::new(true, None);

    app.remember_location(&dir.path().join("clip.mp4"));
    assert_eq!(app.last_directory.as_deref(), Some(dir.path()));

    let sub = dir.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    app.remember_location(&sub);
    assert_eq!(app.last_directory.as_deref(), Some(sub.as_path()));

    // A bare file name has no directory to remember.
    app.remember_location(Path::new("clip.mp4"));
    assert_eq!(app.last_directory.as_deref(), Some(sub.as_path()));
}

#[test]
fn toggle_side_panel_flips() {
    let mut app = App::new(false, None);
    app.toggle_side_panel();
    assert!(app.show_side_panel);
    app.toggle_side_panel();
    assert!(!app.show_side_panel);
}
