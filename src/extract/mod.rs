//! Per-track extraction of demuxed packets to files.

pub mod annexb;
pub mod srt;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use mkvdemux_ebml::ByteSource;
use mkvdemux_matroska::demuxer::MAX_MASKED_TRACKS;
use mkvdemux_matroska::{Demuxer, Packet, TrackInfo};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use annexb::{AnnexBWriter, NalCodec};
use srt::SrtWriter;

/// Codec ID of plain UTF-8 text subtitles.
pub const CODEC_TEXT_UTF8: &str = "S_TEXT/UTF8";

/// How packets of one track are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Srt,
    AnnexB(NalCodec),
    Raw,
}

impl OutputMode {
    pub fn for_track(track: &TrackInfo, config: &ExtractConfig) -> Self {
        if config.subtitles_as_srt && track.is_subtitle() && track.codec_id == CODEC_TEXT_UTF8 {
            return Self::Srt;
        }
        if config.annexb {
            if let Some(codec) = NalCodec::from_codec_id(&track.codec_id) {
                return Self::AnnexB(codec);
            }
        }
        Self::Raw
    }

    /// File extension for a track written in this mode.
    pub fn extension(&self, codec_id: &str) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::AnnexB(codec) => codec.extension(),
            Self::Raw => raw_extension(codec_id),
        }
    }
}

/// File extension for raw packet data of a codec.
pub fn raw_extension(codec_id: &str) -> &'static str {
    match codec_id {
        "A_OPUS" => "opus",
        "A_VORBIS" => "vorbis",
        "A_FLAC" => "flac",
        "A_AC3" => "ac3",
        "A_EAC3" => "eac3",
        "A_DTS" => "dts",
        "A_MPEG/L3" => "mp3",
        "A_MPEG/L2" => "mp2",
        "V_VP8" => "vp8",
        "V_VP9" => "vp9",
        "V_AV1" => "av1",
        "V_MPEG4/ISO/AVC" => "avc",
        "V_MPEGH/ISO/HEVC" => "hevc",
        "S_TEXT/UTF8" => "txt",
        "S_TEXT/ASS" | "S_ASS" => "ass",
        "S_TEXT/SSA" | "S_SSA" => "ssa",
        "S_TEXT/WEBVTT" => "vtt",
        id if id.starts_with("A_AAC") => "aac",
        id if id.starts_with("A_PCM") => "pcm",
        _ => "bin",
    }
}

#[derive(Debug)]
enum Encoder {
    Srt(SrtWriter),
    AnnexB(AnnexBWriter),
    Raw,
}

/// Output of one track: a writer plus the conversion state for its codec.
#[derive(Debug)]
pub struct TrackOutput<W: Write> {
    writer: W,
    encoder: Encoder,
    packets: u64,
    bytes: u64,
}

impl<W: Write> TrackOutput<W> {
    /// Start a track output; SRT outputs get their byte order mark here.
    pub fn new(track: &TrackInfo, mode: OutputMode, mut writer: W) -> io::Result<Self> {
        let encoder = match mode {
            OutputMode::Srt => {
                let srt = SrtWriter::new();
                srt.write_header(&mut writer)?;
                Encoder::Srt(srt)
            }
            OutputMode::AnnexB(codec) => {
                Encoder::AnnexB(AnnexBWriter::new(codec, &track.codec_private))
            }
            OutputMode::Raw => Encoder::Raw,
        };

        Ok(Self {
            writer,
            encoder,
            packets: 0,
            bytes: 0,
        })
    }

    pub fn write_packet(&mut self, packet: &Packet) -> io::Result<()> {
        match &mut self.encoder {
            Encoder::Srt(srt) => {
                srt.write_entry(&mut self.writer, packet.start_ms, packet.end_ms, &packet.data)?
            }
            Encoder::AnnexB(annexb) => annexb.write_packet(&mut self.writer, &packet.data)?,
            Encoder::Raw => self.writer.write_all(&packet.data)?,
        }
        self.packets += 1;
        self.bytes += packet.data.len() as u64;
        Ok(())
    }

    pub fn packets(&self) -> u64 {
        self.packets
    }

    /// Packet payload bytes consumed, before any conversion.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Flush and return the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Result of extracting one track.
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub index: usize,
    pub number: u64,
    pub codec_id: String,
    pub path: PathBuf,
    pub packets: u64,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractSummary {
    pub tracks: Vec<TrackSummary>,
}

impl ExtractSummary {
    pub fn total_packets(&self) -> u64 {
        self.tracks.iter().map(|t| t.packets).sum()
    }
}

/// Warn when forward-only input yielded no packets because every cluster
/// was skipped while reading the segment metadata.
///
/// Returns whether the warning was logged.
pub fn warn_on_skipped_clusters<S: ByteSource>(demuxer: &Demuxer<S>, packets: u64) -> bool {
    let skipped = demuxer.skipped_clusters();
    if packets > 0 || skipped == 0 {
        return false;
    }

    warn!(
        skipped,
        "No packets read: {} cluster(s) were skipped while reading stream metadata; \
         read from a file instead of --stdin to get their packets",
        skipped
    );
    true
}

/// Write every selected track to `<output_dir>/track_<index>.<ext>`.
///
/// An empty `config.tracks` selects all tracks.
pub fn extract_tracks<S: ByteSource>(
    demuxer: &mut Demuxer<S>,
    config: &ExtractConfig,
) -> Result<ExtractSummary> {
    let selected: Vec<usize> = if config.tracks.is_empty() {
        (0..demuxer.track_count()).collect()
    } else {
        for &index in &config.tracks {
            if index >= demuxer.track_count() {
                bail!(
                    "Track index {} out of range ({} tracks)",
                    index,
                    demuxer.track_count()
                );
            }
        }
        config.tracks.clone()
    };

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {:?}",
            config.output_dir
        )
    })?;

    let mut outputs: Vec<Option<(PathBuf, TrackOutput<BufWriter<File>>)>> =
        (0..demuxer.track_count()).map(|_| None).collect();
    for &index in &selected {
        if outputs[index].is_some() {
            continue;
        }
        let Some(track) = demuxer.track(index) else {
            continue;
        };
        let mode = OutputMode::for_track(track, config);
        let path = config.output_dir.join(format!(
            "track_{}.{}",
            index,
            mode.extension(&track.codec_id)
        ));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {:?}", path))?;
        let output = TrackOutput::new(track, mode, BufWriter::new(file))
            .with_context(|| format!("Failed to write output file: {:?}", path))?;

        info!(index, codec = %track.codec_id, path = %path.display(), ?mode, "extracting track");
        outputs[index] = Some((path, output));
    }

    let mask = (0..demuxer.track_count().min(MAX_MASKED_TRACKS))
        .filter(|&index| outputs[index].is_none())
        .fold(0u64, |mask, index| mask | (1 << index));
    demuxer.set_track_mask(mask);

    while let Some(packet) = demuxer.read_packet().context("Failed to read packet")? {
        let Some(index) = demuxer.track_index(packet.track) else {
            debug!(track = packet.track, "packet for unlisted track, skipping");
            continue;
        };
        let Some((path, output)) = outputs[index].as_mut() else {
            continue;
        };
        output
            .write_packet(&packet)
            .with_context(|| format!("Failed to write output file: {:?}", path))?;
    }

    let mut summary = ExtractSummary::default();
    for (index, slot) in outputs.into_iter().enumerate() {
        let Some((path, output)) = slot else {
            continue;
        };
        let (packets, bytes) = (output.packets(), output.bytes());
        output
            .finish()
            .with_context(|| format!("Failed to flush output file: {:?}", path))?;

        let Some(track) = demuxer.track(index) else {
            continue;
        };
        summary.tracks.push(TrackSummary {
            index,
            number: track.number,
            codec_id: track.codec_id.clone(),
            path,
            packets,
            bytes,
        });
    }

    info!(
        tracks = summary.tracks.len(),
        packets = summary.total_packets(),
        "extraction complete"
    );
    warn_on_skipped_clusters(demuxer, summary.total_packets());
    Ok(summary)
}
