use std::path::PathBuf;
use std::time::Duration;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// One watch-history record, written when a media file is loaded.
///
/// Legacy files keyed by `filename`/`timestamp`/`duration` are still accepted
/// on read. A field of an unexpected type reads as empty instead of failing
/// the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(alias = "filename")]
    pub path: String,
    #[serde(
        default,
        alias = "timestamp",
        deserialize_with = "time_code_from_text_or_millis"
    )]
    pub time_code: String,
    #[serde(
        default,
        alias = "duration",
        deserialize_with = "lenient_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_ms: Option<u64>,
    #[serde(
        default,
        deserialize_with = "lenient_volume",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume: Option<u8>,
    #[serde(default)]
    pub date_added: String,
}

impl HistoryEntry {
    /// Build an entry stamped with the current time.
    pub fn new(path: impl Into<String>, time_ms: u64, duration_ms: Option<u64>, volume: Option<u8>) -> Self {
        Self {
            path: path.into(),
            time_code: format_time_code(time_ms),
            duration_ms,
            volume,
            date_added: now_rfc3339(),
        }
    }

    /// Side-panel label: `path - time_code`.
    pub fn label(&self) -> String {
        if self.time_code.is_empty() {
            self.path.clone()
        } else {
            format!("{} - {}", self.path, self.time_code)
        }
    }
}

/// Any JSON value, sorted by how a time or count can be read from it.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Unsigned(u64),
    Float(f64),
    Other(#[allow(dead_code)] IgnoredAny),
}

impl Loose {
    /// Non-negative whole number, truncating fractions. Negative integers
    /// land in `Float` and read as `None`.
    fn as_u64(&self) -> Option<u64> {
        match *self {
            Loose::Unsigned(n) => Some(n),
            Loose::Float(f) if f.is_finite() && f >= 0.0 => Some(f as u64),
            _ => None,
        }
    }
}

fn time_code_from_text_or_millis<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Loose::deserialize(deserializer)?;
    Ok(match raw {
        Loose::Text(s) => s,
        other => other.as_u64().map(format_time_code).unwrap_or_default(),
    })
}

fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?.as_u64())
}

fn lenient_volume<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?
        .as_u64()
        .map(|v| v.min(100) as u8))
}

/// Format milliseconds as `MM:SS`, or `HH:MM:SS` from one hour up.
pub fn format_time_code(ms: u64) -> String {
    let s = ms / 1000;
    let (m, s) = (s / 60, s % 60);
    let (h, m) = (m / 60, m % 60);
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

/// A media file discovered by a folder scan.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub title: String,
    pub duration: Option<Duration>,
}
