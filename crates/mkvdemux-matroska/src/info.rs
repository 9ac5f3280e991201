//! Segment information (the `Info` element).

use chrono::{DateTime, Duration, Utc};
use mkvdemux_ebml::Element;
use tracing::{debug, warn};

use crate::ids;
use crate::Result;

/// Default timestamp scale: one tick is one millisecond.
pub const DEFAULT_TIMESTAMP_SCALE: u64 = 1_000_000;

/// Seconds between the Unix epoch and the Matroska epoch (2001-01-01T00:00:00Z).
const MATROSKA_EPOCH_UNIX_SECS: i64 = 978_307_200;

/// General information about a segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentInfo {
    pub uid: Option<[u8; 16]>,
    pub filename: Option<String>,
    pub prev_uid: Option<[u8; 16]>,
    pub prev_filename: Option<String>,
    pub next_uid: Option<[u8; 16]>,
    pub next_filename: Option<String>,
    /// Nanoseconds per tick.
    pub timestamp_scale: u64,
    /// Segment duration in ticks.
    pub duration: Option<f64>,
    /// Nanoseconds since 2001-01-01T00:00:00Z.
    pub date_utc: Option<i64>,
    pub title: Option<String>,
    pub muxing_app: Option<String>,
    pub writing_app: Option<String>,
}

impl Default for SegmentInfo {
    fn default() -> Self {
        Self {
            uid: None,
            filename: None,
            prev_uid: None,
            prev_filename: None,
            next_uid: None,
            next_filename: None,
            timestamp_scale: DEFAULT_TIMESTAMP_SCALE,
            duration: None,
            date_utc: None,
            title: None,
            muxing_app: None,
            writing_app: None,
        }
    }
}

impl SegmentInfo {
    /// Decode an `Info` element.
    pub fn parse(element: &Element) -> Result<Self> {
        let mut info = Self::default();

        for child in element.children() {
            let child = child?;
            match child.id {
                ids::SEGMENT_UID => info.uid = Some(read_uid(&child)),
                ids::SEGMENT_FILENAME => info.filename = Some(child.as_string()),
                ids::PREV_UID => info.prev_uid = Some(read_uid(&child)),
                ids::PREV_FILENAME => info.prev_filename = Some(child.as_string()),
                ids::NEXT_UID => info.next_uid = Some(read_uid(&child)),
                ids::NEXT_FILENAME => info.next_filename = Some(child.as_string()),
                ids::TIMESTAMP_SCALE => match child.as_uint() {
                    0 => warn!("ignoring zero TimestampScale"),
                    scale => info.timestamp_scale = scale,
                },
                ids::DURATION => info.duration = Some(child.as_float()),
                ids::DATE_UTC => info.date_utc = Some(child.as_int()),
                ids::TITLE => info.title = Some(child.as_string()),
                ids::MUXING_APP => info.muxing_app = Some(child.as_string()),
                ids::WRITING_APP => info.writing_app = Some(child.as_string()),
                other => debug!(id = %other, "skipping Info child"),
            }
        }

        Ok(info)
    }

    /// Segment duration in milliseconds, if known.
    pub fn duration_ms(&self) -> Option<f64> {
        self.duration
            .map(|ticks| ticks * self.timestamp_scale as f64 / 1_000_000.0)
    }

    /// Production date as a UTC timestamp.
    pub fn date_utc_datetime(&self) -> Option<DateTime<Utc>> {
        let epoch = DateTime::from_timestamp(MATROSKA_EPOCH_UNIX_SECS, 0)?;
        epoch.checked_add_signed(Duration::nanoseconds(self.date_utc?))
    }
}

/// 128-bit UIDs; short payloads are zero-padded, long ones cut.
fn read_uid(element: &Element) -> [u8; 16] {
    let data = element.as_bytes();
    if data.len() != 16 {
        warn!(len = data.len(), id = %element.id, "UID is not 16 bytes");
    }

    let mut uid = [0u8; 16];
    let n = data.len().min(16);
    uid[..n].copy_from_slice(&data[..n]);
    uid
}
