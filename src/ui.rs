//! UI rendering helpers for the terminal user interface.
//!
//! Everything here is a pure function of the view model and the session;
//! `draw` never mutates state.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, InputMode, Panel};
use crate::config::UiSettings;
use crate::library::{MediaLibrary, Playlist, format_time_code};
use crate::session::{PlaybackSession, PlaybackState};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("s", "stop");
    // ←/→ is filled from the seek step.
    map.insert("↑/↓", "volume");
    map.insert("o/d", "open file/folder");
    map.insert("f/r", "fav add/remove");
    map.insert("tab", "panel");
    map.insert("j/k", "select");
    map.insert("enter", "load");
    map.insert("1-6", "speed");
    map.insert("n/N", "next/prev");
    map.insert("P", "side panel");
    map.insert("C", "clear history");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_seconds: u64) -> String {
    let order = [
        "space/p", "s", "←/→", "↑/↓", "o/d", "n/N", "1-6", "tab", "j/k", "enter", "f/r", "P",
        "C", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "←/→" {
                Some(format!("[←/→] seek -/+{}s", seek_seconds))
            } else {
                CONTROLS_MAP.get(k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn state_text(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

/// One-line status: state, time, volume and rate.
fn status_text(session: &PlaybackSession) -> String {
    let mut parts = vec![
        state_text(session.state).to_string(),
        session.time_label(),
        format!("Vol: {}%", session.volume),
        format!("Speed: {}x", session.rate),
    ];
    if let Some(ref path) = session.current_file {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            parts.push(format!("Dir: {}", dir.display()));
        }
    }
    parts.join(" • ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn panel_items(
    panel: Panel,
    library: &MediaLibrary,
    playlist: &Playlist,
) -> Vec<ListItem<'static>> {
    match panel {
        Panel::Favorites => library
            .favorites()
            .iter()
            .map(|f| ListItem::new(f.clone()))
            .collect(),
        Panel::History => library
            .history()
            .iter()
            .map(|h| ListItem::new(h.label()))
            .collect(),
        Panel::Folder => playlist
            .items()
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let text = match m.duration {
                    Some(d) => format!("{}  {}", m.title, format_time_code(d.as_millis() as u64)),
                    None => m.title.clone(),
                };
                let item = ListItem::new(text);
                if playlist.current_index() == Some(i) {
                    item.style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect(),
    }
}

fn draw_side_panel(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    library: &MediaLibrary,
    playlist: &Playlist,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (panel, rect) in Panel::ALL.into_iter().zip(rows.iter()) {
        let items = panel_items(panel, library, playlist);
        let focused = app.focus == panel;

        let mut block = Block::default().borders(Borders::ALL).title(panel.title());
        if focused {
            block = block.border_style(Style::default().fg(Color::Cyan));
        }

        let mut state = ListState::default();
        if focused && !items.is_empty() {
            state.select(Some(app.selected(panel)));
        }
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, *rect, &mut state);
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    session: &PlaybackSession,
    library: &MediaLibrary,
    playlist: &Playlist,
    ui_settings: &UiSettings,
    seek_seconds: u64,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let now_playing = session
        .file_name()
        .unwrap_or_else(|| "nothing loaded".to_string());
    let header = Paragraph::new(now_playing)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(ui_settings.header_text.as_str())
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(session))
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" position "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(session.progress())
        .label(session.time_label());
    frame.render_widget(gauge, chunks[2]);

    let body = chunks[3];
    if app.show_side_panel {
        draw_side_panel(frame, body, app, library, playlist);
    } else {
        let idle = Paragraph::new("P shows the side panel")
            .alignment(Alignment::Center)
            .dim()
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(idle, body);
    }

    // Prompt overlay
    if app.is_prompting() {
        let title = match app.input_mode {
            InputMode::OpenFolder => " open folder (enter/esc) ",
            _ => " open file (enter/esc) ",
        };
        let area = centered_rect_sized(72, 3, body);
        frame.render_widget(Clear, area);
        let prompt = Paragraph::new(format!("{}▏", app.input)).block(left_padded(title));
        frame.render_widget(prompt, area);
    }

    // Error overlay, above any prompt
    if let Some(ref message) = app.error {
        let area = centered_rect_sized(72, 6, body);
        frame.render_widget(Clear, area);
        let popup = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .block(left_padded(" error (esc closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, area);
    }

    let footer = Paragraph::new(controls_text(seek_seconds))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
