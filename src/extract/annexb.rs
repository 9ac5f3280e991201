//! Length-prefixed (AVCC/HVCC) to Annex-B conversion for H.264 and H.265 tracks.

use std::io::{self, Write};

const START_CODE_4: [u8; 4] = [0x00, 0x00, 0x00, 0x01];
const START_CODE_3: [u8; 3] = [0x00, 0x00, 0x01];

/// Size of the NAL length prefix in Matroska AVC/HEVC blocks.
const NAL_LENGTH_SIZE: usize = 4;

const HEVC_NAL_VPS: u8 = 32;
const HEVC_NAL_PPS: u8 = 34;
const HEVC_NAL_AUD: u8 = 35;

/// Video codec family of a converted track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NalCodec {
    Avc,
    Hevc,
}

impl NalCodec {
    /// Codec family for a Matroska codec ID, if it carries length-prefixed NAL units.
    pub fn from_codec_id(codec_id: &str) -> Option<Self> {
        match codec_id {
            "V_MPEG4/ISO/AVC" => Some(Self::Avc),
            "V_MPEGH/ISO/HEVC" => Some(Self::Hevc),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Avc => "h264",
            Self::Hevc => "h265",
        }
    }
}

/// Annex-B conversion state for one track.
#[derive(Debug)]
pub struct AnnexBWriter {
    codec: NalCodec,
    codec_private: Vec<u8>,
    config_written: bool,
    first_aud_seen: bool,
}

impl AnnexBWriter {
    pub fn new(codec: NalCodec, codec_private: &[u8]) -> Self {
        Self {
            codec,
            codec_private: codec_private.to_vec(),
            config_written: false,
            first_aud_seen: false,
        }
    }

    /// Write one packet; the parameter sets from the codec private data go first.
    pub fn write_packet<W: Write>(&mut self, out: &mut W, data: &[u8]) -> io::Result<()> {
        if !self.config_written {
            let config = match self.codec {
                NalCodec::Avc => avcc_config_to_annexb(&self.codec_private),
                NalCodec::Hevc => hvcc_config_to_annexb(&self.codec_private),
            };
            out.write_all(&config)?;
            self.config_written = true;
        }
        out.write_all(&self.convert(data))
    }

    /// Replace 4-byte NAL length prefixes with start codes.
    ///
    /// A NAL unit running past the end of `data` is written with a 3-byte
    /// start code followed by whatever bytes remain.
    pub fn convert(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len() + 16);
        let mut pos = 0;

        while pos + NAL_LENGTH_SIZE < data.len() {
            let len = u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
                as usize;
            pos += NAL_LENGTH_SIZE;

            let Some(nal) = data.get(pos..pos.saturating_add(len)) else {
                out.extend_from_slice(&START_CODE_3);
                out.extend_from_slice(&data[pos..]);
                break;
            };

            if self.long_start_code(nal) {
                out.extend_from_slice(&START_CODE_4);
            } else {
                out.extend_from_slice(&START_CODE_3);
            }
            out.extend_from_slice(nal);
            pos += len;
        }

        out
    }

    fn long_start_code(&mut self, nal: &[u8]) -> bool {
        if nal.len() < 2 {
            return false;
        }

        match self.codec {
            NalCodec::Avc => true,
            NalCodec::Hevc => {
                let nal_type = (nal[0] >> 1) & 0x3F;
                if (HEVC_NAL_VPS..=HEVC_NAL_PPS).contains(&nal_type) {
                    true
                } else if nal_type == HEVC_NAL_AUD && !self.first_aud_seen {
                    self.first_aud_seen = true;
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Extract SPS and PPS from an AVCDecoderConfigurationRecord.
///
/// Each parameter set gets a 4-byte start code. Malformed entries are
/// skipped and a truncated record yields what was parsed so far.
pub fn avcc_config_to_annexb(config: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    if config.len() < 6 {
        return out;
    }

    // version, profile, compatibility, level, length size
    let mut pos = 5;
    let num_sps = (config[pos] & 0x1F) as usize;
    pos += 1;
    pos = copy_parameter_sets(config, pos, num_sps, &mut out);

    let Some(&num_pps) = config.get(pos) else {
        return out;
    };
    copy_parameter_sets(config, pos + 1, num_pps as usize, &mut out);

    out
}

/// Extract VPS, SPS, PPS and SEI from an HEVCDecoderConfigurationRecord.
pub fn hvcc_config_to_annexb(config: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    if config.len() < 23 {
        return out;
    }

    let num_arrays = config[22] as usize;
    let mut pos = 23;
    for _ in 0..num_arrays {
        // array_completeness + type, then numNalus
        let Some(count) = config.get(pos + 1..pos + 3) else {
            break;
        };
        let count = u16::from_be_bytes([count[0], count[1]]) as usize;
        pos = copy_parameter_sets(config, pos + 3, count, &mut out);
    }

    out
}

/// Copy `count` 16-bit length-prefixed NAL units starting at `pos`.
///
/// Returns the position after the last entry read, or `config.len()` once an
/// entry runs past the end so no later field is read from inside it.
fn copy_parameter_sets(config: &[u8], mut pos: usize, count: usize, out: &mut Vec<u8>) -> usize {
    for _ in 0..count {
        let Some(len) = config.get(pos..pos + 2) else {
            return config.len();
        };
        let len = u16::from_be_bytes([len[0], len[1]]) as usize;
        pos += 2;

        let Some(nal) = config.get(pos..pos + len) else {
            return config.len();
        };
        out.extend_from_slice(&START_CODE_4);
        out.extend_from_slice(nal);
        pos += len;
    }
    pos
}
