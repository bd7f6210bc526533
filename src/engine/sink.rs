//! Utilities for creating `rodio` sinks from media files.
//!
//! The helpers here encapsulate opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::EngineError;

pub(super) type FileDecoder = Decoder<BufReader<File>>;

/// Open and decode `path`, returning the decoder and its total duration
/// when the container reports one.
pub(super) fn open_decoder(path: &Path) -> Result<(FileDecoder, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => EngineError::NotFound {
            path: path.to_path_buf(),
        },
        _ => EngineError::Open {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();
    Ok((decoder, total))
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let (decoder, total) = open_decoder(path)?;

    // `skip_duration` is the fallback seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
