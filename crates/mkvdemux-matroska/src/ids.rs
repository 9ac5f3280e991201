//! Matroska element IDs (marker bits included).

use mkvdemux_ebml::ElementId;

// Top level
pub const SEGMENT: ElementId = ElementId(0x18538067);
pub const SEEK_HEAD: ElementId = ElementId(0x114D9B74);
pub const INFO: ElementId = ElementId(0x1549A966);
pub const TRACKS: ElementId = ElementId(0x1654AE6B);
pub const CLUSTER: ElementId = ElementId(0x1F43B675);
pub const CUES: ElementId = ElementId(0x1C53BB6B);
pub const CHAPTERS: ElementId = ElementId(0x1043A770);
pub const TAGS: ElementId = ElementId(0x1254C367);
pub const ATTACHMENTS: ElementId = ElementId(0x1941A469);

// Info
pub const SEGMENT_UID: ElementId = ElementId(0x73A4);
pub const SEGMENT_FILENAME: ElementId = ElementId(0x7384);
pub const PREV_UID: ElementId = ElementId(0x3CB923);
pub const PREV_FILENAME: ElementId = ElementId(0x3C83AB);
pub const NEXT_UID: ElementId = ElementId(0x3EB923);
pub const NEXT_FILENAME: ElementId = ElementId(0x3E83BB);
pub const TIMESTAMP_SCALE: ElementId = ElementId(0x2AD7B1);
pub const DURATION: ElementId = ElementId(0x4489);
pub const DATE_UTC: ElementId = ElementId(0x4461);
pub const TITLE: ElementId = ElementId(0x7BA9);
pub const MUXING_APP: ElementId = ElementId(0x4D80);
pub const WRITING_APP: ElementId = ElementId(0x5741);

// Tracks
pub const TRACK_ENTRY: ElementId = ElementId(0xAE);
pub const TRACK_NUMBER: ElementId = ElementId(0xD7);
pub const TRACK_UID: ElementId = ElementId(0x73C5);
pub const TRACK_TYPE: ElementId = ElementId(0x83);
pub const NAME: ElementId = ElementId(0x536E);
pub const LANGUAGE: ElementId = ElementId(0x22B59C);
pub const CODEC_ID: ElementId = ElementId(0x86);
pub const CODEC_PRIVATE: ElementId = ElementId(0x63A2);
pub const CODEC_NAME: ElementId = ElementId(0x258688);
pub const FLAG_ENABLED: ElementId = ElementId(0xB9);
pub const FLAG_DEFAULT: ElementId = ElementId(0x88);
pub const FLAG_FORCED: ElementId = ElementId(0x55AA);
pub const FLAG_LACING: ElementId = ElementId(0x9C);
pub const DEFAULT_DURATION: ElementId = ElementId(0x23E383);
pub const TRACK_TIMESTAMP_SCALE: ElementId = ElementId(0x23314F);
pub const VIDEO: ElementId = ElementId(0xE0);
pub const AUDIO: ElementId = ElementId(0xE1);

// Video
pub const FLAG_INTERLACED: ElementId = ElementId(0x9A);
pub const PIXEL_WIDTH: ElementId = ElementId(0xB0);
pub const PIXEL_HEIGHT: ElementId = ElementId(0xBA);
pub const DISPLAY_WIDTH: ElementId = ElementId(0x54B0);
pub const DISPLAY_HEIGHT: ElementId = ElementId(0x54BA);
pub const PIXEL_CROP_BOTTOM: ElementId = ElementId(0x54AA);
pub const PIXEL_CROP_TOP: ElementId = ElementId(0x54BB);
pub const PIXEL_CROP_LEFT: ElementId = ElementId(0x54CC);
pub const PIXEL_CROP_RIGHT: ElementId = ElementId(0x54DD);
pub const DISPLAY_UNIT: ElementId = ElementId(0x54B2);

// Audio
pub const SAMPLING_FREQUENCY: ElementId = ElementId(0xB5);
pub const OUTPUT_SAMPLING_FREQUENCY: ElementId = ElementId(0x78B5);
pub const CHANNELS: ElementId = ElementId(0x9F);
pub const BIT_DEPTH: ElementId = ElementId(0x6264);

// Cluster
pub const TIMESTAMP: ElementId = ElementId(0xE7);
pub const SIMPLE_BLOCK: ElementId = ElementId(0xA3);
pub const BLOCK_GROUP: ElementId = ElementId(0xA0);
pub const BLOCK: ElementId = ElementId(0xA1);
pub const BLOCK_DURATION: ElementId = ElementId(0x9B);
