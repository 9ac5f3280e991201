use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub demux: DemuxConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DemuxConfig {
    /// Largest element payload the demuxer will buffer, in bytes
    #[serde(default = "default_max_element_size")]
    pub max_element_size: u64,
}

fn default_max_element_size() -> u64 {
    mkvdemux_ebml::DEFAULT_MAX_ELEMENT_SIZE
}

impl Default for DemuxConfig {
    fn default() -> Self {
        Self {
            max_element_size: default_max_element_size(),
        }
    }
}

impl DemuxConfig {
    pub fn to_options(&self) -> mkvdemux_matroska::DemuxerOptions {
        mkvdemux_matroska::DemuxerOptions::new().max_element_size(self.max_element_size)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtractConfig {
    /// Directory that receives the per-track output files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Convert AVC/HEVC tracks from length-prefixed NAL units to Annex-B
    #[serde(default = "default_true")]
    pub annexb: bool,

    /// Write S_TEXT/UTF8 tracks as SRT
    #[serde(default = "default_true")]
    pub subtitles_as_srt: bool,

    /// Track indices to extract (empty = all)
    #[serde(default)]
    pub tracks: Vec<usize>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            annexb: true,
            subtitles_as_srt: true,
            tracks: Vec::new(),
        }
    }
}
