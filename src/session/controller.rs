use std::path::Path;

use tracing::{Span, debug, error, info, warn};

use crate::config::{LibrarySettings, PlaybackSettings};
use crate::engine::{EngineError, PlaybackEngine};
use crate::library::{self, HistoryEntry, MediaLibrary, Playlist};

use super::command::{Command, Flow};
use super::error::SessionError;
use super::model::{PlaybackSession, PlaybackState};

/// Owns the playback session and drives the engine from `Command`s.
///
/// Engine failures other than a failed load are logged and the command
/// becomes a no-op; the session only changes state after the engine
/// accepted the call.
pub struct SessionController<E: PlaybackEngine> {
    engine: E,
    library: MediaLibrary,
    playlist: Playlist,
    session: PlaybackSession,
    playback: PlaybackSettings,
    scan_settings: LibrarySettings,
    span: Span,
}

impl<E: PlaybackEngine> SessionController<E> {
    pub fn new(
        engine: E,
        library: MediaLibrary,
        playback: PlaybackSettings,
        scan_settings: LibrarySettings,
        span: Span,
    ) -> Self {
        let mut controller = Self {
            engine,
            library,
            playlist: Playlist::default(),
            session: PlaybackSession::new(playback.default_volume),
            playback,
            scan_settings,
            span,
        };
        let volume = controller.session.volume;
        controller.engine_call("set_volume", |e| e.set_volume(volume));
        controller
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn library(&self) -> &MediaLibrary {
        &self.library
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Handle one command. Only load failures are returned to the caller.
    pub fn dispatch(&mut self, cmd: Command) -> Result<Flow, SessionError> {
        debug!(parent: &self.span, ?cmd, "dispatch");
        match cmd {
            Command::Open(path) => self.load(&path)?,
            Command::OpenFolder(dir) => {
                self.open_folder(&dir)?;
            }
            Command::PlayItem(i) => self.play_item(i)?,
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::PlayPause => self.toggle_play_pause(),
            Command::Stop => self.stop(),
            Command::Seek(fraction) => self.seek(fraction),
            Command::SeekBy(delta_ms) => self.seek_by(delta_ms),
            Command::SetVolume(v) => self.set_volume(v),
            Command::VolumeUp => self.volume_up(),
            Command::VolumeDown => self.volume_down(),
            Command::SetRate(r) => self.set_rate(r),
            Command::RatePreset(i) => {
                if let Some(r) = self.playback.rate_presets.get(i).copied() {
                    self.set_rate(r);
                }
            }
            Command::Next => self.next()?,
            Command::Prev => self.prev()?,
            Command::AddFavorite => {
                self.add_current_to_favorites();
            }
            Command::RemoveFavorite(name) => {
                self.remove_favorite(&name);
            }
            Command::ClearHistory => self.clear_history(),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Open `path` and start playing it from the beginning.
    ///
    /// On failure the session is left Stopped with nothing loaded. If the
    /// file opens but will not play, it stays loaded and Stopped and no
    /// history entry is written.
    pub fn load(&mut self, path: &Path) -> Result<(), SessionError> {
        info!(parent: &self.span, path = %path.display(), "loading media");

        if self.session.is_loaded() {
            self.engine_call("stop", |e| e.stop());
        }
        self.session.reset_transport();
        self.session.current_file = None;
        self.session.duration_ms = 0;

        if let Err(source) = self.engine.open(path) {
            error!(parent: &self.span, path = %path.display(), error = %source, "media load failed");
            return Err(SessionError::MediaLoad {
                path: path.to_path_buf(),
                source,
            });
        }

        self.session.current_file = Some(path.to_path_buf());
        self.session.duration_ms = self.engine.length_ms();
        self.playlist.sync_to(path);

        // Only media that actually started counts as watched.
        if !self.engine_call("play", |e| e.play()) {
            return Ok(());
        }
        self.session.state = PlaybackState::Playing;

        let duration = self.session.duration_ms;
        let entry = HistoryEntry::new(
            path.display().to_string(),
            self.engine.time_ms(),
            (duration > 0).then_some(duration),
            Some(self.session.volume),
        );
        self.library.add_history(entry);
        Ok(())
    }

    /// Stopped/Paused -> Playing. Does nothing without loaded media.
    pub fn play(&mut self) {
        if !self.session.is_loaded() {
            debug!(parent: &self.span, "play ignored, nothing loaded");
            return;
        }
        if self.session.state == PlaybackState::Playing {
            return;
        }
        if self.engine_call("play", |e| e.play()) {
            self.session.state = PlaybackState::Playing;
        }
    }

    /// Playing -> Paused; no-op in any other state.
    pub fn pause(&mut self) {
        if self.session.state != PlaybackState::Playing {
            return;
        }
        if self.engine_call("pause", |e| e.pause()) {
            self.session.state = PlaybackState::Paused;
        }
    }

    pub fn toggle_play_pause(&mut self) {
        match self.session.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Any state -> Stopped, position back to 0. The media stays loaded.
    pub fn stop(&mut self) {
        if self.engine_call("stop", |e| e.stop()) {
            self.session.reset_transport();
        }
    }

    /// Seek to `fraction` of the duration.
    ///
    /// Out-of-range fractions are clamped to 0..=1 and NaN is ignored.
    /// Ignored while stopped or when the duration is unknown.
    pub fn seek(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        if !self.can_seek() {
            debug!(parent: &self.span, fraction, "seek ignored");
            return;
        }
        if self.engine_call("set_position", |e| e.set_position(fraction)) {
            self.session.position_ms = (fraction * self.session.duration_ms as f64).round() as u64;
        }
    }

    /// Seek relative to the current time, saturating at 0 and the duration.
    pub fn seek_by(&mut self, delta_ms: i64) {
        if !self.can_seek() {
            debug!(parent: &self.span, delta_ms, "seek ignored");
            return;
        }
        let now = self.engine.time_ms() as i64;
        let target = now.saturating_add(delta_ms).max(0) as u64;
        let target = target.min(self.session.duration_ms);
        if self.engine_call("set_time", |e| e.set_time_ms(target)) {
            self.session.position_ms = target;
        }
    }

    /// Set the volume, clamped to 0..=100.
    pub fn set_volume(&mut self, volume: i32) {
        let volume = volume.clamp(0, 100) as u8;
        if self.engine_call("set_volume", |e| e.set_volume(volume)) {
            self.session.volume = volume;
        }
    }

    pub fn volume_up(&mut self) {
        let v = i32::from(self.session.volume) + i32::from(self.playback.volume_step);
        self.set_volume(v);
    }

    pub fn volume_down(&mut self) {
        let v = i32::from(self.session.volume) - i32::from(self.playback.volume_step);
        self.set_volume(v);
    }

    /// Set the rate, clamped to the configured range. Non-finite input is ignored.
    pub fn set_rate(&mut self, rate: f32) {
        if !rate.is_finite() {
            return;
        }
        let rate = rate.clamp(self.playback.min_rate, self.playback.max_rate);
        if self.engine_call("set_rate", |e| e.set_rate(rate)) {
            self.session.rate = rate;
        }
    }

    /// Refresh position and duration from the engine. Called on every timer tick.
    ///
    /// A Playing session whose engine went idle has reached the end of the media.
    pub fn poll(&mut self) {
        if !self.session.is_loaded() || self.session.state == PlaybackState::Stopped {
            return;
        }

        let length = self.engine.length_ms();
        if length > 0 {
            self.session.duration_ms = length;
        }
        let mut position = self.engine.time_ms();
        if self.session.duration_ms > 0 {
            position = position.min(self.session.duration_ms);
        }
        self.session.position_ms = position;

        if self.session.state == PlaybackState::Playing && !self.engine.is_playing() {
            info!(parent: &self.span, "playback finished");
            self.engine_call("stop", |e| e.stop());
            self.session.reset_transport();
        }
    }

    /// Replace the playlist with the media files found in `dir`.
    pub fn open_folder(&mut self, dir: &Path) -> Result<usize, SessionError> {
        if !dir.is_dir() {
            warn!(parent: &self.span, path = %dir.display(), "not a directory");
            return Err(SessionError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let items = library::scan(dir, &self.scan_settings);
        let count = items.len();
        self.playlist.replace(items);
        if let Some(current) = self.session.current_file.clone() {
            self.playlist.sync_to(&current);
        }

        info!(parent: &self.span, path = %dir.display(), count, "folder opened");
        Ok(count)
    }

    pub fn play_item(&mut self, index: usize) -> Result<(), SessionError> {
        let Some(path) = self.playlist.get(index).map(|m| m.path.clone()) else {
            return Ok(());
        };
        self.load(&path)
    }

    /// Load the playlist item after the current one. Does not wrap.
    pub fn next(&mut self) -> Result<(), SessionError> {
        match self.playlist.next_index() {
            Some(i) => self.play_item(i),
            None => Ok(()),
        }
    }

    /// Load the playlist item before the current one. Does not wrap.
    pub fn prev(&mut self) -> Result<(), SessionError> {
        match self.playlist.prev_index() {
            Some(i) => self.play_item(i),
            None => Ok(()),
        }
    }

    pub fn add_current_to_favorites(&mut self) -> bool {
        let Some(name) = self.current_name() else {
            return false;
        };
        self.library.add_favorite(&name)
    }

    pub fn remove_favorite(&mut self, name: &str) -> bool {
        self.library.remove_favorite(name)
    }

    pub fn clear_history(&mut self) {
        self.library.clear_history();
    }

    /// Release the engine. The controller should not be used afterwards.
    pub fn shutdown(&mut self) {
        self.engine_call("stop", |e| e.stop());
        self.engine.release();
        self.session.reset_transport();
        info!(parent: &self.span, "session closed");
    }

    fn current_name(&self) -> Option<String> {
        self.session
            .current_file
            .as_ref()
            .map(|p| p.display().to_string())
    }

    fn can_seek(&self) -> bool {
        self.session.is_loaded()
            && self.session.state != PlaybackState::Stopped
            && self.session.duration_ms > 0
    }

    fn engine_call(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut E) -> Result<(), EngineError>,
    ) -> bool {
        match f(&mut self.engine) {
            Ok(()) => true,
            Err(e) => {
                warn!(parent: &self.span, op, error = %e, "engine call failed");
                false
            }
        }
    }
}
