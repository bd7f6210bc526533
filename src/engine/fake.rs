//! In-memory `PlaybackEngine` used by the session and runtime tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{EngineError, PlaybackEngine};

pub(crate) const LENGTH_MS: u64 = 100_000;

#[derive(Default)]
pub(crate) struct FakeState {
    pub(crate) media: Option<PathBuf>,
    pub(crate) playing: bool,
    pub(crate) time_ms: u64,
    pub(crate) volume: u8,
    pub(crate) rate: f32,
    pub(crate) fail_open: bool,
    pub(crate) fail_play: bool,
    pub(crate) fail_seek: bool,
    pub(crate) released: bool,
}

/// Engine double; the test keeps a handle to the shared state.
#[derive(Clone, Default)]
pub(crate) struct FakeEngine(pub(crate) Rc<RefCell<FakeState>>);

impl PlaybackEngine for FakeEngine {
    fn open(&mut self, path: &Path) -> Result<(), EngineError> {
        let mut s = self.0.borrow_mut();
        if s.fail_open {
            return Err(EngineError::NotFound {
                path: path.to_path_buf(),
            });
        }
        s.media = Some(path.to_path_buf());
        s.playing = false;
        s.time_ms = 0;
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let mut s = self.0.borrow_mut();
        if s.media.is_none() {
            return Err(EngineError::NoMedia);
        }
        if s.fail_play {
            return Err(EngineError::Output("device lost".into()));
        }
        s.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.0.borrow_mut().playing = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        let mut s = self.0.borrow_mut();
        s.playing = false;
        s.time_ms = 0;
        Ok(())
    }

    fn set_position(&mut self, fraction: f64) -> Result<(), EngineError> {
        let t = (fraction * self.length_ms() as f64).round() as u64;
        self.set_time_ms(t)
    }

    fn position(&self) -> f64 {
        self.time_ms() as f64 / LENGTH_MS as f64
    }

    fn set_time_ms(&mut self, ms: u64) -> Result<(), EngineError> {
        let mut s = self.0.borrow_mut();
        if s.fail_seek {
            return Err(EngineError::Seek("unsupported".into()));
        }
        s.time_ms = ms;
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<(), EngineError> {
        self.0.borrow_mut().volume = volume;
        Ok(())
    }

    fn volume(&self) -> u8 {
        self.0.borrow().volume
    }

    fn set_rate(&mut self, rate: f32) -> Result<(), EngineError> {
        self.0.borrow_mut().rate = rate;
        Ok(())
    }

    fn rate(&self) -> f32 {
        self.0.borrow().rate
    }

    fn is_playing(&self) -> bool {
        self.0.borrow().playing
    }

    fn time_ms(&self) -> u64 {
        self.0.borrow().time_ms
    }

    fn length_ms(&self) -> u64 {
        if self.0.borrow().media.is_some() { LENGTH_MS } else { 0 }
    }

    fn release(&mut self) {
        let mut s = self.0.borrow_mut();
        s.media = None;
        s.playing = false;
        s.released = true;
    }
}
