//! mkvdemux-matroska: Matroska and WebM demuxing
//!
//! Builds on `mkvdemux-ebml` to read the segment metadata of a Matroska or
//! WebM file and pull timestamped packets out of its clusters.
//!
//! # Modules
//!
//! - `demuxer` - The [`Demuxer`] facade: metadata queries and packet reading
//! - `segment` - Segment header and segment-level dispatch
//! - `info` - Segment information (timestamp scale, duration, titles)
//! - `tracks` - Track entries with video and audio parameters
//! - `cluster` - Cluster scanning
//! - `block` - SimpleBlock/BlockGroup decoding and lacing
//! - `packet` - Packets and packet flags
//! - `metadata` - Cue, chapter, tag and attachment entry types
//! - `ids` - Matroska element IDs
//!
//! # Input modes
//!
//! [`Demuxer::new`] takes random-access input: the metadata walk stops at the
//! first Cluster and packet reading resumes there. [`Demuxer::streaming`]
//! takes forward-only input: the walk runs to the end of the segment
//! metadata, skipping any clusters on the way.

pub mod block;
pub mod cluster;
pub mod demuxer;
pub mod error;
pub mod ids;
pub mod info;
pub mod metadata;
pub mod packet;
pub mod segment;
pub mod tracks;

pub use demuxer::{Demuxer, DemuxerOptions, Packets, SeekFlags};
pub use error::{Error, Result};
pub use info::SegmentInfo;
pub use metadata::{Attachment, Chapter, CuePoint, Tag};
pub use packet::{Packet, PacketFlags};
pub use segment::{ElementSpan, SegmentPosition, TopLevelPositions};
pub use tracks::{AudioInfo, TrackInfo, TrackType, VideoInfo};

pub use mkvdemux_ebml::EbmlHeader;
