use std::env;
use std::error::Error;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, info_span, warn};

use crate::app::App;
use crate::session::{Command, Flow};

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

/// `replay [FILE_OR_DIR]`: set everything up, run the TUI, tear down.
pub fn run() -> Result<(), Box<dyn Error>> {
    let (settings, fallback) = settings::load_settings();
    let _log_guard = startup::init_logging(&settings)?;

    let root = info_span!("replay");
    info!(parent: &root, version = env!("CARGO_PKG_VERSION"), "starting");
    if let Some(msg) = fallback {
        warn!(parent: &root, "{msg}");
    }

    let state_path = settings.storage.state_path();
    let ui_state = startup::load_ui_state(&state_path, &settings, &root);

    let mut controller = startup::build_controller(&settings, &root)?;
    controller.set_volume(i32::from(ui_state.volume));
    let mut app = App::new(settings.ui.show_side_panel, ui_state.last_directory);

    let (control_tx, control_rx) = mpsc::channel::<Command>();
    let mpris = crate::mpris::spawn_mpris(
        control_tx,
        (settings.playback.min_rate, settings.playback.max_rate),
        info_span!(parent: &root, "mpris"),
    );

    if let Some(arg) = env::args_os().nth(1) {
        let path = PathBuf::from(arg);
        let cmd = if path.is_dir() {
            Command::OpenFolder(path)
        } else {
            Command::Open(path)
        };
        if event_loop::apply(cmd, &mut app, &mut controller, &root) == Flow::Quit {
            startup::close_session(&mut controller, &app, &state_path, &root);
            return Ok(());
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &mpris,
        &control_rx,
        &mut state,
        &root,
    );

    startup::close_session(&mut controller, &app, &state_path, &root);
    let restored = restore_terminal(&mut terminal);
    info!(parent: &root, "exiting");

    run_result?;
    Ok(restored?)
}

/// Undo the terminal setup. Every step runs; the first error is returned.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    raw.and(screen).and(cursor)
}
