use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{Span, debug, info, warn};

use crate::library::probe_duration;

use super::sink::create_sink_at;
use super::types::{EngineError, PlaybackEngine};

/// `PlaybackEngine` on top of the default `rodio` output device.
///
/// One paused `Sink` is built per opened file. Stopping drops the sink;
/// the next `play` rebuilds it from the start.
pub struct RodioEngine {
    stream: OutputStream,
    media: Option<PathBuf>,
    sink: Option<Sink>,
    length: Duration,
    // Where the current sink's source starts, when built with `skip_duration`.
    base: Duration,
    volume: u8,
    rate: f32,
    span: Span,
}

impl RodioEngine {
    pub fn new(span: Span) -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would land on the TUI.
        stream.log_on_drop(false);

        info!(parent: &span, "audio output opened");
        Ok(Self {
            stream,
            media: None,
            sink: None,
            length: Duration::ZERO,
            base: Duration::ZERO,
            volume: 50,
            rate: 1.0,
            span,
        })
    }

    /// Build a fresh paused sink for the current media at `start_at`.
    fn rebuild_sink(&mut self, start_at: Duration) -> Result<(), EngineError> {
        let path = self.media.as_deref().ok_or(EngineError::NoMedia)?;
        let (sink, _) = create_sink_at(&self.stream, path, start_at)?;
        self.apply_levels(&sink);
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.base = start_at;
        Ok(())
    }

    fn apply_levels(&self, sink: &Sink) {
        sink.set_volume(f32::from(self.volume) / 100.0);
        sink.set_speed(self.rate);
    }

    fn elapsed(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.base + s.get_pos())
    }
}

impl PlaybackEngine for RodioEngine {
    fn open(&mut self, path: &Path) -> Result<(), EngineError> {
        if !path.exists() {
            return Err(EngineError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let (sink, total) = create_sink_at(&self.stream, path, Duration::ZERO)?;
        self.apply_levels(&sink);
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }

        self.length = total
            .or_else(|| probe_duration(path))
            .unwrap_or(Duration::ZERO);
        self.base = Duration::ZERO;
        self.media = Some(path.to_path_buf());

        debug!(
            parent: &self.span,
            path = %path.display(),
            length_ms = self.length.as_millis() as u64,
            "media opened"
        );
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if self.media.is_none() {
            return Err(EngineError::NoMedia);
        }
        let needs_rebuild = self.sink.as_ref().is_none_or(|s| s.empty());
        if needs_rebuild {
            self.rebuild_sink(Duration::ZERO)?;
        }
        if let Some(ref s) = self.sink {
            s.play();
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        if let Some(ref s) = self.sink {
            s.pause();
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.base = Duration::ZERO;
        Ok(())
    }

    fn set_position(&mut self, fraction: f64) -> Result<(), EngineError> {
        let fraction = fraction.clamp(0.0, 1.0);
        let target = self.length.as_secs_f64() * fraction;
        self.set_time_ms((target * 1000.0).round() as u64)
    }

    fn position(&self) -> f64 {
        if self.length.is_zero() {
            return 0.0;
        }
        (self.elapsed().as_secs_f64() / self.length.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn set_time_ms(&mut self, ms: u64) -> Result<(), EngineError> {
        let mut target = Duration::from_millis(ms);
        if !self.length.is_zero() {
            target = target.min(self.length);
        }

        let Some(ref sink) = self.sink else {
            return Err(EngineError::NoMedia);
        };

        match sink.try_seek(target) {
            Ok(()) => {
                self.base = Duration::ZERO;
                Ok(())
            }
            Err(e) => {
                // Not every decoder can seek; rebuild and skip into the file instead.
                warn!(parent: &self.span, error = %e, "seek unsupported, rebuilding sink");
                let was_paused = sink.is_paused();
                self.rebuild_sink(target)
                    .map_err(|e| EngineError::Seek(e.to_string()))?;
                if !was_paused {
                    if let Some(ref s) = self.sink {
                        s.play();
                    }
                }
                Ok(())
            }
        }
    }

    fn set_volume(&mut self, volume: u8) -> Result<(), EngineError> {
        self.volume = volume.min(100);
        if let Some(ref s) = self.sink {
            s.set_volume(f32::from(self.volume) / 100.0);
        }
        Ok(())
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn set_rate(&mut self, rate: f32) -> Result<(), EngineError> {
        self.rate = rate;
        if let Some(ref s) = self.sink {
            s.set_speed(rate);
        }
        Ok(())
    }

    fn rate(&self) -> f32 {
        self.rate
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|s| !s.is_paused() && !s.empty())
    }

    fn time_ms(&self) -> u64 {
        let elapsed = self.elapsed();
        let elapsed = if self.length.is_zero() {
            elapsed
        } else {
            elapsed.min(self.length)
        };
        elapsed.as_millis() as u64
    }

    fn length_ms(&self) -> u64 {
        self.length.as_millis() as u64
    }

    fn release(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.media = None;
        self.length = Duration::ZERO;
        self.base = Duration::ZERO;
        debug!(parent: &self.span, "engine released");
    }
}
