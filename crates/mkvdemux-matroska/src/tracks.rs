//! Track metadata (the `Tracks` element).

use mkvdemux_ebml::Element;
use tracing::debug;

use crate::ids;
use crate::Result;

/// Kind of media carried by a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackType {
    Video,
    Audio,
    Complex,
    Logo,
    Subtitle,
    Buttons,
    Control,
    Metadata,
    Unknown(u8),
}

impl TrackType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Video,
            2 => Self::Audio,
            3 => Self::Complex,
            0x10 => Self::Logo,
            0x11 => Self::Subtitle,
            0x12 => Self::Buttons,
            0x20 => Self::Control,
            0x21 => Self::Metadata,
            other => Self::Unknown(other),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Video => 1,
            Self::Audio => 2,
            Self::Complex => 3,
            Self::Logo => 0x10,
            Self::Subtitle => 0x11,
            Self::Buttons => 0x12,
            Self::Control => 0x20,
            Self::Metadata => 0x21,
            Self::Unknown(v) => *v,
        }
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Complex => write!(f, "complex"),
            Self::Logo => write!(f, "logo"),
            Self::Subtitle => write!(f, "subtitle"),
            Self::Buttons => write!(f, "buttons"),
            Self::Control => write!(f, "control"),
            Self::Metadata => write!(f, "metadata"),
            Self::Unknown(v) => write!(f, "unknown({})", v),
        }
    }
}

/// Video parameters of a track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoInfo {
    pub interlaced: bool,
    pub pixel_width: u64,
    pub pixel_height: u64,
    /// Defaults to `pixel_width`.
    pub display_width: u64,
    /// Defaults to `pixel_height`.
    pub display_height: u64,
    pub crop_top: u64,
    pub crop_bottom: u64,
    pub crop_left: u64,
    pub crop_right: u64,
    pub display_unit: u64,
}

impl VideoInfo {
    /// Decode a `Video` element.
    pub fn parse(element: &Element) -> Result<Self> {
        let mut video = Self::default();
        let mut display_width = None;
        let mut display_height = None;

        for child in element.children() {
            let child = child?;
            match child.id {
                ids::FLAG_INTERLACED => video.interlaced = child.as_uint() == 1,
                ids::PIXEL_WIDTH => video.pixel_width = child.as_uint(),
                ids::PIXEL_HEIGHT => video.pixel_height = child.as_uint(),
                ids::DISPLAY_WIDTH => display_width = Some(child.as_uint()),
                ids::DISPLAY_HEIGHT => display_height = Some(child.as_uint()),
                ids::PIXEL_CROP_TOP => video.crop_top = child.as_uint(),
                ids::PIXEL_CROP_BOTTOM => video.crop_bottom = child.as_uint(),
                ids::PIXEL_CROP_LEFT => video.crop_left = child.as_uint(),
                ids::PIXEL_CROP_RIGHT => video.crop_right = child.as_uint(),
                ids::DISPLAY_UNIT => video.display_unit = child.as_uint(),
                other => debug!(id = %other, "skipping Video child"),
            }
        }

        video.display_width = display_width.unwrap_or(video.pixel_width);
        video.display_height = display_height.unwrap_or(video.pixel_height);
        Ok(video)
    }
}

/// Audio parameters of a track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioInfo {
    /// Hz, default 8000.
    pub sampling_frequency: f64,
    /// Hz, defaults to `sampling_frequency`.
    pub output_sampling_frequency: f64,
    pub channels: u64,
    pub bit_depth: Option<u64>,
}

impl Default for AudioInfo {
    fn default() -> Self {
        Self {
            sampling_frequency: 8000.0,
            output_sampling_frequency: 8000.0,
            channels: 1,
            bit_depth: None,
        }
    }
}

impl AudioInfo {
    /// Decode an `Audio` element.
    pub fn parse(element: &Element) -> Result<Self> {
        let mut audio = Self::default();
        let mut output_frequency = None;

        for child in element.children() {
            let child = child?;
            match child.id {
                ids::SAMPLING_FREQUENCY => audio.sampling_frequency = child.as_float(),
                ids::OUTPUT_SAMPLING_FREQUENCY => output_frequency = Some(child.as_float()),
                ids::CHANNELS => audio.channels = child.as_uint(),
                ids::BIT_DEPTH => audio.bit_depth = Some(child.as_uint()),
                other => debug!(id = %other, "skipping Audio child"),
            }
        }

        audio.output_sampling_frequency = output_frequency.unwrap_or(audio.sampling_frequency);
        Ok(audio)
    }
}

/// Metadata of one track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackInfo {
    /// Track number used by blocks to refer to this track.
    pub number: u64,
    pub uid: u64,
    pub track_type: TrackType,
    pub name: Option<String>,
    /// ISO 639-2 language, default `eng`.
    pub language: String,
    pub codec_id: String,
    pub codec_private: Vec<u8>,
    /// Human-readable codec name as stored in the file.
    pub codec_name: Option<String>,
    pub enabled: bool,
    pub default: bool,
    pub forced: bool,
    pub lacing: bool,
    /// Nanoseconds per frame.
    pub default_duration: Option<u64>,
    pub track_timestamp_scale: f64,
    pub video: Option<VideoInfo>,
    pub audio: Option<AudioInfo>,
}

impl Default for TrackInfo {
    fn default() -> Self {
        Self {
            number: 0,
            uid: 0,
            track_type: TrackType::Unknown(0),
            name: None,
            language: "eng".to_string(),
            codec_id: String::new(),
            codec_private: Vec::new(),
            codec_name: None,
            enabled: true,
            default: true,
            forced: false,
            lacing: true,
            default_duration: None,
            track_timestamp_scale: 1.0,
            video: None,
            audio: None,
        }
    }
}

impl TrackInfo {
    /// Decode a `TrackEntry` element.
    pub fn parse(element: &Element) -> Result<Self> {
        let mut track = Self::default();

        for child in element.children() {
            let child = child?;
            match child.id {
                ids::TRACK_NUMBER => track.number = child.as_uint(),
                ids::TRACK_UID => track.uid = child.as_uint(),
                // Codes above 0xFF are not truncated onto a known type.
                ids::TRACK_TYPE => {
                    track.track_type = u8::try_from(child.as_uint())
                        .map_or(TrackType::Unknown(u8::MAX), TrackType::from_u8)
                }
                ids::NAME => track.name = Some(child.as_string()),
                ids::LANGUAGE => track.language = child.as_string(),
                ids::CODEC_ID => track.codec_id = child.as_string(),
                ids::CODEC_PRIVATE => track.codec_private = child.as_bytes().to_vec(),
                ids::CODEC_NAME => track.codec_name = Some(child.as_string()),
                ids::FLAG_ENABLED => track.enabled = child.as_uint() != 0,
                ids::FLAG_DEFAULT => track.default = child.as_uint() != 0,
                ids::FLAG_FORCED => track.forced = child.as_uint() != 0,
                ids::FLAG_LACING => track.lacing = child.as_uint() != 0,
                ids::DEFAULT_DURATION => track.default_duration = Some(child.as_uint()),
                ids::TRACK_TIMESTAMP_SCALE => track.track_timestamp_scale = child.as_float(),
                ids::VIDEO => track.video = Some(VideoInfo::parse(&child)?),
                ids::AUDIO => track.audio = Some(AudioInfo::parse(&child)?),
                other => debug!(id = %other, track = track.number, "skipping TrackEntry child"),
            }
        }

        Ok(track)
    }

    /// Codec name for display: the stored CodecName, a well-known name, or the raw codec ID.
    pub fn codec_name(&self) -> &str {
        match self.codec_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => well_known_codec_name(&self.codec_id).unwrap_or(&self.codec_id),
        }
    }

    pub fn is_video(&self) -> bool {
        self.track_type == TrackType::Video
    }

    pub fn is_audio(&self) -> bool {
        self.track_type == TrackType::Audio
    }

    pub fn is_subtitle(&self) -> bool {
        self.track_type == TrackType::Subtitle
    }
}

/// Decode a `Tracks` element into tracks sorted by track number.
///
/// The sort is stable, so entries sharing a number keep file order.
pub fn parse_tracks(element: &Element) -> Result<Vec<TrackInfo>> {
    let mut tracks = Vec::new();

    for child in element.children() {
        let child = child?;
        if child.id == ids::TRACK_ENTRY {
            tracks.push(TrackInfo::parse(&child)?);
        } else {
            debug!(id = %child.id, "skipping Tracks child");
        }
    }

    tracks.sort_by_key(|t| t.number);
    Ok(tracks)
}

fn well_known_codec_name(codec_id: &str) -> Option<&'static str> {
    let name = match codec_id {
        // Video
        "V_MPEG4/ISO/AVC" => "AVC",
        "V_MPEGH/ISO/HEVC" => "HEVC",
        "V_AV1" => "AV1",
        "V_VP8" => "VP8",
        "V_VP9" => "VP9",
        "V_MPEG1" => "MPEG-1",
        "V_MPEG2" => "MPEG-2",
        "V_MPEG4/ISO/SP" | "V_MPEG4/ISO/ASP" | "V_MPEG4/ISO/AP" => "MPEG-4",
        "V_THEORA" => "Theora",

        // Audio
        "A_AAC" | "A_AAC/MPEG2/LC" | "A_AAC/MPEG4/LC" | "A_AAC/MPEG4/LC/SBR" => "AAC",
        "A_AC3" => "AC-3",
        "A_EAC3" => "E-AC-3",
        "A_DTS" => "DTS",
        "A_TRUEHD" => "TrueHD",
        "A_FLAC" => "FLAC",
        "A_VORBIS" => "Vorbis",
        "A_OPUS" => "Opus",
        "A_PCM/INT/LIT" | "A_PCM/INT/BIG" => "PCM",
        "A_PCM/FLOAT/IEEE" => "PCM Float",
        "A_MPEG/L3" => "MP3",
        "A_MPEG/L2" => "MP2",

        // Subtitles
        "S_TEXT/UTF8" => "SRT",
        "S_TEXT/SSA" | "S_TEXT/ASS" => "ASS",
        "S_TEXT/WEBVTT" => "WebVTT",
        "S_HDMV/PGS" => "PGS",
        "S_VOBSUB" => "VobSub",
        _ => return None,
    };
    Some(name)
}
