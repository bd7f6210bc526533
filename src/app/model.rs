//! Application model types: `App`, `Panel` and `InputMode`.

use std::path::{Path, PathBuf};

use crate::library::HistoryEntry;
use crate::session::Command;

/// The side-panel lists, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Favorites,
    History,
    Folder,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Favorites, Panel::History, Panel::Folder];

    pub fn next(self) -> Self {
        match self {
            Panel::Favorites => Panel::History,
            Panel::History => Panel::Folder,
            Panel::Folder => Panel::Favorites,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Panel::Favorites => " favorites ",
            Panel::History => " history ",
            Panel::Folder => " folder ",
        }
    }

    fn slot(self) -> usize {
        match self {
            Panel::Favorites => 0,
            Panel::History => 1,
            Panel::Folder => 2,
        }
    }
}

/// What keystrokes currently feed into.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a media file path.
    OpenFile,
    /// Typing a directory path.
    OpenFolder,
}

/// Lengths of the three side-panel lists, used to keep selections in range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelLens {
    pub favorites: usize,
    pub history: usize,
    pub folder: usize,
}

impl PanelLens {
    pub fn of(&self, panel: Panel) -> usize {
        match panel {
            Panel::Favorites => self.favorites,
            Panel::History => self.history,
            Panel::Folder => self.folder,
        }
    }
}

/// The main application view model.
#[derive(Debug, Default)]
pub struct App {
    pub show_side_panel: bool,
    pub focus: Panel,
    selected: [usize; 3],

    pub input_mode: InputMode,
    pub input: String,

    /// Message shown in a popup until dismissed.
    pub error: Option<String>,
    /// Directory the last file or folder was opened from.
    pub last_directory: Option<PathBuf>,
}

impl App {
    pub fn new(show_side_panel: bool, last_directory: Option<PathBuf>) -> Self {
        Self {
            show_side_panel,
            last_directory,
            ..Self::default()
        }
    }

    pub fn toggle_side_panel(&mut self) {
        self.show_side_panel = !self.show_side_panel;
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn selected(&self, panel: Panel) -> usize {
        self.selected[panel.slot()]
    }

    /// Move the focused selection down, wrapping to the top.
    pub fn select_next(&mut self, len: usize) {
        let slot = &mut self.selected[self.focus.slot()];
        *slot = if len == 0 { 0 } else { (*slot + 1) % len };
    }

    /// Move the focused selection up, wrapping to the bottom.
    pub fn select_prev(&mut self, len: usize) {
        let slot = &mut self.selected[self.focus.slot()];
        *slot = match (len, *slot) {
            (0, _) => 0,
            (_, 0) => len - 1,
            (_, s) => s - 1,
        };
    }

    /// Pull selections back inside their lists after those lists shrank.
    pub fn clamp_selections(&mut self, lens: PanelLens) {
        for panel in Panel::ALL {
            let len = lens.of(panel);
            let slot = &mut self.selected[panel.slot()];
            if *slot >= len {
                *slot = len.saturating_sub(1);
            }
        }
    }

    /// Point the folder panel at the playing item.
    pub fn follow_folder(&mut self, index: Option<usize>) {
        if let Some(i) = index {
            self.selected[Panel::Folder.slot()] = i;
        }
    }

    /// The command that loads the focused selection, if there is one.
    pub fn activate(
        &self,
        favorites: &[String],
        history: &[HistoryEntry],
        folder_len: usize,
    ) -> Option<Command> {
        let i = self.selected(self.focus);
        match self.focus {
            Panel::Favorites => favorites.get(i).map(|f| Command::Open(PathBuf::from(f))),
            Panel::History => history
                .get(i)
                .map(|h| Command::Open(PathBuf::from(&h.path))),
            Panel::Folder => (i < folder_len).then_some(Command::PlayItem(i)),
        }
    }

    /// The favorite under the cursor, when the favorites panel has focus.
    pub fn selected_favorite<'a>(&self, favorites: &'a [String]) -> Option<&'a str> {
        if self.focus != Panel::Favorites {
            return None;
        }
        favorites
            .get(self.selected(Panel::Favorites))
            .map(String::as_str)
    }

    /// Open a path prompt, pre-filled with the last directory.
    pub fn begin_prompt(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input = self
            .last_directory
            .as_ref()
            .map(|d| format!("{}/", d.display().to_string().trim_end_matches('/')))
            .unwrap_or_default();
    }

    pub fn is_prompting(&self) -> bool {
        self.input_mode != InputMode::Normal
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn cancel_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Close the prompt and turn its text into a command.
    ///
    /// Blank input just closes the prompt. A leading `~` expands to `$HOME`.
    pub fn submit_prompt(&mut self) -> Option<Command> {
        let mode = self.input_mode;
        let text = std::mem::take(&mut self.input);
        self.input_mode = InputMode::Normal;

        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let path = expand_home(text);
        match mode {
            InputMode::Normal => None,
            InputMode::OpenFile => Some(Command::Open(path)),
            InputMode::OpenFolder => Some(Command::OpenFolder(path)),
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Close the error popup. Returns whether one was open.
    pub fn dismiss_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    /// Remember where `path` lives for the next prompt.
    pub fn remember_location(&mut self, path: &Path) {
        let dir = if path.is_dir() {
            Some(path)
        } else {
            path.parent().filter(|p| !p.as_os_str().is_empty())
        };
        if let Some(dir) = dir {
            self.last_directory = Some(dir.to_path_buf());
        }
    }
}

fn expand_home(text: &str) -> PathBuf {
    if let Some(rest) = text.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(text)
}
