use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{Span, debug, error};

use crate::app::{App, InputMode, PanelLens};
use crate::config;
use crate::engine::PlaybackEngine;
use crate::mpris::MprisHandle;
use crate::runtime::mpris_sync::{MprisSnapshot, update_mpris};
use crate::session::{Command, Flow, SessionController};
use crate::ui;

/// Longest wait for a key before the loop redraws.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    last_tick: Instant,
    /// Last session status pushed to MPRIS.
    last_mpris: Option<MprisSnapshot>,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            last_mpris: None,
        }
    }
}

impl Default for EventLoopState {
    fn default() -> Self {
        Self::new()
    }
}

/// Main terminal event loop: ticks the session, draws, and routes keys and
/// MPRIS calls into commands. Returns `Ok(())` when quit is requested.
#[allow(clippy::too_many_arguments)]
pub fn run<E: PlaybackEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut SessionController<E>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<Command>,
    state: &mut EventLoopState,
    span: &Span,
) -> Result<(), Box<dyn Error>> {
    let tick = Duration::from_millis(settings.ui.tick_ms);

    loop {
        if state.last_tick.elapsed() >= tick {
            controller.poll();
            state.last_tick = Instant::now();
        }

        // MPRIS also sees changes that came from the tick, like reaching the end.
        let snapshot = MprisSnapshot::of(controller.session());
        if state.last_mpris.as_ref() != Some(&snapshot) {
            update_mpris(mpris, controller.session());
            state.last_mpris = Some(snapshot);
        }

        app.clamp_selections(PanelLens {
            favorites: controller.library().favorites().len(),
            history: controller.library().history().len(),
            folder: controller.playlist().len(),
        });

        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                controller.session(),
                controller.library(),
                controller.playlist(),
                &settings.ui,
                settings.playback.seek_step_seconds,
            )
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            if apply(cmd, app, controller, span) == Flow::Quit {
                return Ok(());
            }
        }

        let wait = INPUT_POLL.min(tick.saturating_sub(state.last_tick.elapsed()));
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller, span) == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }
}

/// Dispatch one command and reflect its outcome in the view model.
///
/// Failures become the error popup; the loop keeps running.
pub fn apply<E: PlaybackEngine>(
    cmd: Command,
    app: &mut App,
    controller: &mut SessionController<E>,
    span: &Span,
) -> Flow {
    let opened: Option<PathBuf> = match &cmd {
        Command::Open(p) | Command::OpenFolder(p) => Some(p.clone()),
        _ => None,
    };

    match controller.dispatch(cmd) {
        Ok(flow) => {
            if let Some(p) = opened {
                app.remember_location(&p);
            }
            app.follow_folder(controller.playlist().current_index());
            flow
        }
        Err(e) => {
            error!(parent: span, error = %e, "command failed");
            app.show_error(e.to_string());
            Flow::Continue
        }
    }
}

/// Keys that map straight onto a session command, independent of focus.
fn command_for_key(code: KeyCode, seek_ms: i64) -> Option<Command> {
    let cmd = match code {
        KeyCode::Char(' ') | KeyCode::Char('p') => Command::PlayPause,
        KeyCode::Char('s') => Command::Stop,
        KeyCode::Left => Command::SeekBy(-seek_ms),
        KeyCode::Right => Command::SeekBy(seek_ms),
        KeyCode::Up => Command::VolumeUp,
        KeyCode::Down => Command::VolumeDown,
        KeyCode::Char('f') => Command::AddFavorite,
        KeyCode::Char('n') => Command::Next,
        KeyCode::Char('N') => Command::Prev,
        KeyCode::Char('C') => Command::ClearHistory,
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Char(c @ '1'..='6') => Command::RatePreset(c as usize - '1' as usize),
        _ => return None,
    };
    Some(cmd)
}

fn handle_key_event<E: PlaybackEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut SessionController<E>,
    span: &Span,
) -> Flow {
    // An open popup swallows keys until dismissed.
    if app.error.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            app.dismiss_error();
        }
        return Flow::Continue;
    }

    if app.is_prompting() {
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.pop_input(),
            KeyCode::Enter => {
                if let Some(cmd) = app.submit_prompt() {
                    return apply(cmd, app, controller, span);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_input(c),
            _ => {}
        }
        return Flow::Continue;
    }

    let seek_ms = i64::try_from(settings.playback.seek_step_seconds.saturating_mul(1000))
        .unwrap_or(i64::MAX);
    if let Some(cmd) = command_for_key(key.code, seek_ms) {
        return apply(cmd, app, controller, span);
    }

    let lens = PanelLens {
        favorites: controller.library().favorites().len(),
        history: controller.library().history().len(),
        folder: controller.playlist().len(),
    };

    match key.code {
        KeyCode::Char('o') => app.begin_prompt(InputMode::OpenFile),
        KeyCode::Char('d') => app.begin_prompt(InputMode::OpenFolder),
        KeyCode::Char('P') => app.toggle_side_panel(),
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::Char('j') => app.select_next(lens.of(app.focus)),
        KeyCode::Char('k') => app.select_prev(lens.of(app.focus)),
        KeyCode::Char('r') => {
            let name = app
                .selected_favorite(controller.library().favorites())
                .map(str::to_string);
            if let Some(name) = name {
                return apply(Command::RemoveFavorite(name), app, controller, span);
            }
        }
        KeyCode::Enter => {
            let cmd = app.activate(
                controller.library().favorites(),
                controller.library().history(),
                controller.playlist().len(),
            );
            if let Some(cmd) = cmd {
                return apply(cmd, app, controller, span);
            }
        }
        other => debug!(parent: span, key = ?other, "unbound key"),
    }
    Flow::Continue
}
