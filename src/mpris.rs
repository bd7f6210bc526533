//! MPRIS2 remote control over D-Bus.
//!
//! The service runs on its own thread. Method calls and property writes are
//! forwarded as `Command`s on a channel; properties are read from a snapshot
//! the runtime keeps current through `MprisHandle`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{Span, info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::session::{Command, PlaybackState};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.replay";

#[derive(Debug)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    position_micros: i64,
    volume: u8,
    rate: f32,
    rate_range: (f32, f32),
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            playback: PlaybackState::Stopped,
            title: None,
            url: None,
            length_micros: None,
            position_micros: 0,
            volume: 0,
            rate: 1.0,
            rate_range: (1.0, 1.0),
        }
    }
}

fn ms_to_micros(ms: u64) -> i64 {
    i64::try_from(ms.saturating_mul(1000)).unwrap_or(i64::MAX)
}

/// Publishes the session status to the MPRIS service thread.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    pub fn set_levels(&self, position_ms: u64, volume: u8, rate: f32) {
        if let Ok(mut s) = self.state.lock() {
            s.position_micros = ms_to_micros(position_ms);
            s.volume = volume;
            s.rate = rate;
        }
    }

    /// Describe the loaded media; `None` clears the metadata.
    pub fn set_track(&self, track: Option<(&str, &std::path::Path, u64)>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        match track {
            Some((title, path, length_ms)) => {
                s.title = Some(title.to_string());
                s.url = Some(format!("file://{}", path.display()));
                s.length_micros = (length_ms > 0).then(|| ms_to_micros(length_ms));
            }
            None => {
                s.title = None;
                s.url = None;
                s.length_micros = None;
            }
        }
    }
}

fn status_str(playback: PlaybackState) -> &'static str {
    match playback {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

fn owned<'a>(value: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(value.into()).ok()
}

struct RootIface {
    tx: Sender<Command>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // Nothing to raise in a terminal.
    }

    fn quit(&self) {
        let _ = self.tx.send(Command::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "replay"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<Command>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(Command::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(Command::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(Command::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(Command::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(Command::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(Command::Stop);
    }

    /// Relative seek, in microseconds.
    fn seek(&self, offset: i64) {
        let _ = self.tx.send(Command::SeekBy(offset / 1000));
    }

    /// Absolute seek, in microseconds. Ignored while the length is unknown
    /// and for positions outside `0..=length`.
    fn set_position(&self, _track_id: ObjectPath<'_>, position: i64) {
        let length = self.state.lock().ok().and_then(|s| s.length_micros);
        let Some(length) = length.filter(|l| *l > 0) else {
            return;
        };
        if (0..=length).contains(&position) {
            let _ = self
                .tx
                .send(Command::Seek(position as f64 / length as f64));
        }
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        status_str(s.playback)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state.lock().map_or(0, |s| s.position_micros)
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        self.state.lock().map_or(0.0, |s| f64::from(s.volume) / 100.0)
    }

    #[zbus(property)]
    fn set_volume(&mut self, volume: f64) {
        if volume.is_finite() {
            let _ = self
                .tx
                .send(Command::SetVolume((volume * 100.0).round() as i32));
        }
    }

    #[zbus(property)]
    fn rate(&self) -> f64 {
        self.state.lock().map_or(1.0, |s| f64::from(s.rate))
    }

    #[zbus(property)]
    fn set_rate(&mut self, rate: f64) {
        let _ = self.tx.send(Command::SetRate(rate as f32));
    }

    #[zbus(property)]
    fn minimum_rate(&self) -> f64 {
        self.state.lock().map_or(1.0, |s| f64::from(s.rate_range.0))
    }

    #[zbus(property)]
    fn maximum_rate(&self) -> f64 {
        self.state.lock().map_or(1.0, |s| f64::from(s.rate_range.1))
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(v) = owned(s.title.clone().unwrap_or_default()) {
            map.insert("xesam:title".to_string(), v);
        }
        if let Some(v) = s.url.clone().and_then(owned) {
            map.insert("xesam:url".to_string(), v);
        }
        if let Some(v) = s.length_micros.and_then(owned) {
            map.insert("mpris:length".to_string(), v);
        }
        map
    }
}

/// Start the MPRIS service thread. Bus failures are logged and leave the
/// handle working as a no-op sink.
///
/// `rate_range` is the (min, max) playback rate the session accepts.
pub fn spawn_mpris(tx: Sender<Command>, rate_range: (f32, f32), span: Span) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState {
        rate_range,
        ..SharedState::default()
    }));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(parent: &span, error = %e, "session bus unavailable");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(parent: &span, error = %e, name = BUS_NAME, "failed to acquire bus name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(parent: &span, error = %e, "failed to register root interface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(parent: &span, error = %e, "failed to register player interface");
                return;
            }

            info!(parent: &span, name = BUS_NAME, "mpris service registered");

            // Keep the connection alive.
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}
