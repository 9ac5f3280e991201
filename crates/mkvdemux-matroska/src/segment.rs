//! Segment-level metadata walk.
//!
//! Reads the Segment header and dispatches its children until the first
//! Cluster (random-access input) or until the end of the segment
//! (forward-only input, where clusters are skipped).

use mkvdemux_ebml::{ByteSource, EbmlReader, ElementHeader, ElementId};
use tracing::{debug, trace};

use crate::ids;
use crate::info::SegmentInfo;
use crate::tracks::{parse_tracks, TrackInfo};
use crate::Result;

/// Location of the Segment element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentPosition {
    /// Absolute offset of the Segment ID.
    pub offset: u64,
    /// Absolute offset of the first child.
    pub data_offset: u64,
    /// Payload size, `u64::MAX` when the segment declared an unknown size.
    pub size: u64,
}

impl SegmentPosition {
    pub fn is_unknown_size(&self) -> bool {
        self.size == mkvdemux_ebml::UNKNOWN_SIZE
    }

    /// One past the last payload byte; saturates for unknown sizes.
    pub fn end(&self) -> u64 {
        self.data_offset.saturating_add(self.size)
    }
}

/// Payload range of a segment-level element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementSpan {
    pub offset: u64,
    pub end: u64,
}

impl From<&ElementHeader> for ElementSpan {
    fn from(header: &ElementHeader) -> Self {
        Self {
            offset: header.data_offset,
            end: header.end(),
        }
    }
}

/// Positions of segment-level elements seen during the metadata walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TopLevelPositions {
    pub seek_head: Option<ElementSpan>,
    pub cues: Option<ElementSpan>,
    pub chapters: Option<ElementSpan>,
    pub tags: Option<ElementSpan>,
    pub attachments: Option<ElementSpan>,
}

/// Everything learned before the first packet.
#[derive(Debug, Clone)]
pub struct SegmentMetadata {
    pub segment: SegmentPosition,
    pub info: Option<SegmentInfo>,
    pub tracks: Vec<TrackInfo>,
    pub positions: TopLevelPositions,
    /// Header of the Cluster the walk stopped at; its payload is unread.
    pub first_cluster: Option<ElementHeader>,
    /// Bounded clusters skipped on forward-only input; their packets are lost.
    pub skipped_clusters: usize,
}

/// Read the Segment header and its metadata children.
pub fn read_segment<S: ByteSource>(reader: &mut EbmlReader<S>) -> Result<SegmentMetadata> {
    let offset = reader.position();
    let header = reader
        .read_element_header_lenient()?
        .ok_or(mkvdemux_ebml::Error::TruncatedInput { offset })?;
    if header.id != ids::SEGMENT {
        return Err(mkvdemux_ebml::Error::unexpected(ids::SEGMENT, header.id).into());
    }

    let segment = SegmentPosition {
        offset: header.offset,
        data_offset: header.data_offset,
        size: header.size,
    };
    debug!(
        offset = segment.offset,
        size = segment.size,
        unknown_size = segment.is_unknown_size(),
        "Segment"
    );

    let mut meta = SegmentMetadata {
        segment,
        info: None,
        tracks: Vec::new(),
        positions: TopLevelPositions::default(),
        first_cluster: None,
        skipped_clusters: 0,
    };
    let seekable = reader.is_seekable();

    while reader.position() < segment.end() {
        let Some(child) = reader.read_element_header_lenient()? else {
            debug!("end of stream during segment metadata");
            break;
        };

        match child.id {
            ids::INFO => {
                let element = reader.read_payload(&child)?;
                meta.info = Some(SegmentInfo::parse(&element)?);
            }
            ids::TRACKS => {
                let element = reader.read_payload(&child)?;
                meta.tracks = parse_tracks(&element)?;
                debug!(count = meta.tracks.len(), "Tracks");
            }
            ids::CLUSTER => {
                // Unknown-size clusters cannot be skipped, so packet reading starts there.
                if seekable || child.is_unknown_size() {
                    debug!(offset = child.offset, "first Cluster, metadata complete");
                    meta.first_cluster = Some(child);
                    break;
                }
                debug!(offset = child.offset, "skipping Cluster in sequential mode");
                reader.skip_element(&child)?;
                meta.skipped_clusters += 1;
            }
            ids::CUES => {
                meta.positions.cues = Some(ElementSpan::from(&child));
                reader.skip_element(&child)?;
            }
            ids::CHAPTERS => {
                meta.positions.chapters = Some(ElementSpan::from(&child));
                reader.skip_element(&child)?;
            }
            ids::TAGS => {
                meta.positions.tags = Some(ElementSpan::from(&child));
                reader.skip_element(&child)?;
            }
            ids::ATTACHMENTS => {
                meta.positions.attachments = Some(ElementSpan::from(&child));
                reader.skip_element(&child)?;
            }
            ids::SEEK_HEAD => {
                meta.positions.seek_head = Some(ElementSpan::from(&child));
                reader.skip_element(&child)?;
            }
            ElementId::VOID | ElementId::CRC32 => {
                trace!(id = %child.id, size = child.size, "skipping padding");
                reader.skip_element(&child)?;
            }
            other => {
                debug!(id = %other, size = child.size, "skipping segment child");
                reader.skip_element(&child)?;
            }
        }
    }

    Ok(meta)
}
