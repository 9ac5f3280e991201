//! The demuxer facade.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use bitflags::bitflags;
use mkvdemux_ebml::{ByteSource, EbmlHeader, EbmlReader, Seekable, Streamed};
use tracing::{debug, info};

use crate::cluster::PacketReader;
use crate::info::{SegmentInfo, DEFAULT_TIMESTAMP_SCALE};
use crate::metadata::{Attachment, Chapter, CuePoint, Tag};
use crate::packet::Packet;
use crate::segment::{read_segment, SegmentPosition, TopLevelPositions};
use crate::tracks::TrackInfo;
use crate::{Error, Result};

/// Document types the demuxer accepts.
pub const SUPPORTED_DOC_TYPES: &[&str] = &["matroska", "webm"];

/// Largest number of tracks a track mask can address.
pub const MAX_MASKED_TRACKS: usize = 64;

/// Demuxer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemuxerOptions {
    /// Largest element payload that will be buffered, in bytes.
    pub max_element_size: u64,
}

impl Default for DemuxerOptions {
    fn default() -> Self {
        Self {
            max_element_size: mkvdemux_ebml::DEFAULT_MAX_ELEMENT_SIZE,
        }
    }
}

impl DemuxerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload ceiling.
    pub fn max_element_size(mut self, max: u64) -> Self {
        self.max_element_size = max;
        self
    }
}

bitflags! {
    /// Seek behaviour flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SeekFlags: u32 {
        const TO_PREV_KEYFRAME = 1;
        const TO_PREV_KEYFRAME_STRICT = 2;
    }
}

/// Matroska/WebM demuxer.
///
/// Construction reads the EBML header and segment metadata; packets are then
/// pulled one at a time with [`read_packet`](Self::read_packet).
///
/// # Example
///
/// ```no_run
/// use mkvdemux_matroska::Demuxer;
///
/// let mut demuxer = Demuxer::open("movie.mkv")?;
/// for track in demuxer.tracks() {
///     println!("{} {}", track.number, track.codec_name());
/// }
/// while let Some(packet) = demuxer.read_packet()? {
///     println!("{} {} {}", packet.track, packet.start_ms, packet.data.len());
/// }
/// # Ok::<(), mkvdemux_matroska::Error>(())
/// ```
#[derive(Debug)]
pub struct Demuxer<S> {
    reader: EbmlReader<S>,
    header: EbmlHeader,
    segment: SegmentPosition,
    info: Option<SegmentInfo>,
    tracks: Vec<TrackInfo>,
    positions: TopLevelPositions,
    packets: PacketReader,
    skipped_clusters: usize,
    track_mask: u64,
}

impl<R: Read + Seek> Demuxer<Seekable<R>> {
    /// Demux random-access input.
    pub fn new(source: R) -> Result<Self> {
        Self::with_options(Seekable::new(source), DemuxerOptions::default())
    }
}

impl Demuxer<Seekable<BufReader<File>>> {
    /// Open a file for demuxing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> Demuxer<Streamed<R>> {
    /// Demux forward-only input.
    ///
    /// Clusters found before the end of the segment metadata are skipped,
    /// so their packets are not returned.
    pub fn streaming(source: R) -> Result<Self> {
        Self::with_options(Streamed::new(source), DemuxerOptions::default())
    }
}

impl<S: ByteSource> Demuxer<S> {
    /// Demux `source` with explicit options.
    pub fn with_options(source: S, options: DemuxerOptions) -> Result<Self> {
        let mut reader = EbmlReader::new(source).with_max_element_size(options.max_element_size);

        let header = EbmlHeader::read(&mut reader)?;
        if !SUPPORTED_DOC_TYPES.contains(&header.doc_type.as_str()) {
            return Err(Error::UnsupportedDocType(header.doc_type));
        }

        let meta = read_segment(&mut reader)?;
        info!(
            doc_type = %header.doc_type,
            tracks = meta.tracks.len(),
            seekable = reader.is_seekable(),
            "opened document"
        );

        Ok(Self {
            reader,
            header,
            segment: meta.segment,
            info: meta.info,
            tracks: meta.tracks,
            positions: meta.positions,
            packets: PacketReader::new(meta.first_cluster),
            skipped_clusters: meta.skipped_clusters,
            track_mask: 0,
        })
    }

    pub fn header(&self) -> &EbmlHeader {
        &self.header
    }

    pub fn segment_info(&self) -> Option<&SegmentInfo> {
        self.info.as_ref()
    }

    /// Nanoseconds per tick; the default applies when Info is missing.
    pub fn timestamp_scale(&self) -> u64 {
        self.info
            .as_ref()
            .map_or(DEFAULT_TIMESTAMP_SCALE, |info| info.timestamp_scale)
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Track at `index` in track-number order.
    pub fn track(&self, index: usize) -> Option<&TrackInfo> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[TrackInfo] {
        &self.tracks
    }

    pub fn track_by_number(&self, number: u64) -> Option<&TrackInfo> {
        self.tracks.iter().find(|t| t.number == number)
    }

    /// Index of the track with the given number.
    pub fn track_index(&self, number: u64) -> Option<usize> {
        self.tracks.iter().position(|t| t.number == number)
    }

    pub fn segment_position(&self) -> &SegmentPosition {
        &self.segment
    }

    /// Absolute offset of the first byte of the segment payload.
    pub fn segment_start(&self) -> u64 {
        self.segment.data_offset
    }

    /// One past the last segment byte, `u64::MAX` for unknown-size segments.
    pub fn segment_end(&self) -> u64 {
        self.segment.end()
    }

    pub fn positions(&self) -> &TopLevelPositions {
        &self.positions
    }

    /// Absolute offset of the Cues payload, if Cues were seen.
    pub fn cues_position(&self) -> Option<u64> {
        self.positions.cues.map(|span| span.offset)
    }

    pub fn cues_end(&self) -> Option<u64> {
        self.positions.cues.map(|span| span.end)
    }

    /// Cue points are not decoded; always empty.
    pub fn cues(&self) -> &[CuePoint] {
        &[]
    }

    /// Chapters are not decoded; always empty.
    pub fn chapters(&self) -> &[Chapter] {
        &[]
    }

    /// Tags are not decoded; always empty.
    pub fn tags(&self) -> &[Tag] {
        &[]
    }

    /// Attachments are not decoded; always empty.
    pub fn attachments(&self) -> &[Attachment] {
        &[]
    }

    /// Number of clusters skipped while reading forward-only metadata.
    ///
    /// Packets in those clusters are not returned by
    /// [`read_packet`](Self::read_packet). Always 0 for random-access input.
    pub fn skipped_clusters(&self) -> usize {
        self.skipped_clusters
    }

    /// Whether the input supports random access.
    pub fn is_seekable(&self) -> bool {
        self.reader.is_seekable()
    }

    /// Ignore packets of tracks whose index bit is set in `mask`.
    pub fn set_track_mask(&mut self, mask: u64) {
        debug!(mask, "track mask");
        self.track_mask = mask;
    }

    pub fn track_mask(&self) -> u64 {
        self.track_mask
    }

    /// Read the next packet of an unmasked track.
    ///
    /// Returns `Ok(None)` at end of stream. Errors are terminal; the stream
    /// position afterwards is unspecified.
    pub fn read_packet(&mut self) -> Result<Option<Packet>> {
        self.read_packet_masked(self.track_mask)
    }

    /// Like [`read_packet`](Self::read_packet) with a one-off mask.
    pub fn read_packet_masked(&mut self, mask: u64) -> Result<Option<Packet>> {
        let scale = self.timestamp_scale();
        loop {
            let Some(packet) = self.packets.next_packet(&mut self.reader, scale)? else {
                return Ok(None);
            };
            if !self.is_masked(packet.track, mask) {
                return Ok(Some(packet));
            }
        }
    }

    /// Iterate over the remaining packets.
    ///
    /// The iterator ends after the first error.
    pub fn packets(&mut self) -> Packets<'_, S> {
        Packets {
            demuxer: self,
            done: false,
        }
    }

    /// Seeking is not supported; has no effect.
    pub fn seek(&mut self, timecode: u64, flags: SeekFlags) {
        debug!(timecode, flags = flags.bits(), "seek not supported, ignoring");
    }

    /// Cue-aware seeking is not supported; has no effect.
    pub fn seek_cue_aware(&mut self, timecode: u64, flags: SeekFlags, fuzzy: bool) {
        debug!(
            timecode,
            flags = flags.bits(),
            fuzzy,
            "cue-aware seek not supported, ignoring"
        );
    }

    /// Not supported; has no effect.
    pub fn skip_to_keyframe(&mut self) {
        debug!("skip to keyframe not supported, ignoring");
    }

    /// No packets are queued, so there is never a lowest queued timecode.
    pub fn lowest_queued_timecode(&self) -> Option<u64> {
        None
    }

    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }

    fn is_masked(&self, track_number: u64, mask: u64) -> bool {
        match self.track_index(track_number) {
            Some(index) if index < MAX_MASKED_TRACKS => mask & (1u64 << index) != 0,
            _ => false,
        }
    }
}

/// Iterator over packets, see [`Demuxer::packets`].
#[derive(Debug)]
pub struct Packets<'a, S> {
    demuxer: &'a mut Demuxer<S>,
    done: bool,
}

impl<S: ByteSource> Iterator for Packets<'_, S> {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.demuxer.read_packet() {
            Ok(Some(packet)) => Some(Ok(packet)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: ByteSource> std::iter::FusedIterator for Packets<'_, S> {}
