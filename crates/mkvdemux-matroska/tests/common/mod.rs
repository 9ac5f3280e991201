//! In-memory Matroska fixture builder for integration tests.

#![allow(dead_code)]

use mkvdemux_ebml::vint::{encode_vint, unknown_size_marker};

pub const EBML: u32 = 0x1A45DFA3;
pub const DOC_TYPE: u32 = 0x4282;
pub const SEGMENT: u32 = 0x18538067;
pub const SEEK_HEAD: u32 = 0x114D9B74;
pub const INFO: u32 = 0x1549A966;
pub const TIMESTAMP_SCALE: u32 = 0x2AD7B1;
pub const DURATION: u32 = 0x4489;
pub const TRACKS: u32 = 0x1654AE6B;
pub const TRACK_ENTRY: u32 = 0xAE;
pub const TRACK_NUMBER: u32 = 0xD7;
pub const TRACK_TYPE: u32 = 0x83;
pub const CODEC_ID: u32 = 0x86;
pub const VIDEO: u32 = 0xE0;
pub const AUDIO: u32 = 0xE1;
pub const PIXEL_WIDTH: u32 = 0xB0;
pub const PIXEL_HEIGHT: u32 = 0xBA;
pub const CLUSTER: u32 = 0x1F43B675;
pub const TIMESTAMP: u32 = 0xE7;
pub const SIMPLE_BLOCK: u32 = 0xA3;
pub const BLOCK_GROUP: u32 = 0xA0;
pub const BLOCK: u32 = 0xA1;
pub const BLOCK_DURATION: u32 = 0x9B;
pub const CUES: u32 = 0x1C53BB6B;
pub const TAGS: u32 = 0x1254C367;
pub const VOID: u32 = 0xEC;

/// Encoded ID bytes; the marker bit decides the length.
pub fn id_bytes(id: u32) -> Vec<u8> {
    let bytes = id.to_be_bytes();
    let skip = (id.leading_zeros() / 8) as usize;
    bytes[skip.min(3)..].to_vec()
}

pub fn element(id: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = id_bytes(id);
    out.extend(encode_vint(payload.len() as u64).expect("payload too large"));
    out.extend_from_slice(payload);
    out
}

pub fn master(id: u32, children: &[Vec<u8>]) -> Vec<u8> {
    element(id, &children.concat())
}

/// A master element whose size field is the 8-byte unknown-size marker.
pub fn unknown_size_master(id: u32, children: &[Vec<u8>]) -> Vec<u8> {
    let mut out = id_bytes(id);
    out.extend(unknown_size_marker(8).unwrap());
    out.extend(children.concat());
    out
}

pub fn uint(id: u32, value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = (value.leading_zeros() / 8) as usize;
    element(id, &bytes[skip.min(7)..])
}

pub fn float(id: u32, value: f64) -> Vec<u8> {
    element(id, &value.to_be_bytes())
}

pub fn string(id: u32, value: &str) -> Vec<u8> {
    element(id, value.as_bytes())
}

pub fn ebml_header(doc_type: &str) -> Vec<u8> {
    master(EBML, &[uint(0x4286, 1), string(DOC_TYPE, doc_type)])
}

pub fn info(timestamp_scale: u64) -> Vec<u8> {
    master(
        INFO,
        &[uint(TIMESTAMP_SCALE, timestamp_scale), float(DURATION, 5000.0)],
    )
}

pub fn track_entry(number: u64, track_type: u64, codec_id: &str, extra: &[Vec<u8>]) -> Vec<u8> {
    let mut children = vec![
        uint(TRACK_NUMBER, number),
        uint(TRACK_TYPE, track_type),
        string(CODEC_ID, codec_id),
    ];
    children.extend_from_slice(extra);
    master(TRACK_ENTRY, &children)
}

pub fn tracks(entries: &[Vec<u8>]) -> Vec<u8> {
    master(TRACKS, entries)
}

/// Block payload: track VINT, signed timecode, flags, data.
pub fn block_payload(track: u64, timecode: i16, flags: u8, data: &[u8]) -> Vec<u8> {
    let mut out = encode_vint(track).unwrap();
    out.extend_from_slice(&timecode.to_be_bytes());
    out.push(flags);
    out.extend_from_slice(data);
    out
}

pub fn simple_block(track: u64, timecode: i16, flags: u8, data: &[u8]) -> Vec<u8> {
    element(SIMPLE_BLOCK, &block_payload(track, timecode, flags, data))
}

pub fn block_group(track: u64, timecode: i16, duration: Option<u64>, data: &[u8]) -> Vec<u8> {
    let mut children = vec![element(BLOCK, &block_payload(track, timecode, 0, data))];
    if let Some(duration) = duration {
        children.push(uint(BLOCK_DURATION, duration));
    }
    master(BLOCK_GROUP, &children)
}

pub fn cluster(timestamp: u64, blocks: &[Vec<u8>]) -> Vec<u8> {
    let mut children = vec![uint(TIMESTAMP, timestamp)];
    children.extend_from_slice(blocks);
    master(CLUSTER, &children)
}

/// A complete document: EBML header plus a bounded Segment.
pub fn document(doc_type: &str, segment_children: &[Vec<u8>]) -> Vec<u8> {
    let mut out = ebml_header(doc_type);
    out.extend(master(SEGMENT, segment_children));
    out
}

/// A complete document whose Segment has unknown size.
pub fn live_document(doc_type: &str, segment_children: &[Vec<u8>]) -> Vec<u8> {
    let mut out = ebml_header(doc_type);
    out.extend(unknown_size_master(SEGMENT, segment_children));
    out
}

/// Two tracks (video 1, audio 2) and one cluster at timestamp 1000.
pub fn sample_file() -> Vec<u8> {
    document(
        "matroska",
        &[
            info(1_000_000),
            tracks(&[
                track_entry(
                    1,
                    1,
                    "V_MPEG4/ISO/AVC",
                    &[master(VIDEO, &[uint(PIXEL_WIDTH, 1920), uint(PIXEL_HEIGHT, 1080)])],
                ),
                track_entry(2, 2, "A_OPUS", &[master(AUDIO, &[])]),
            ]),
            cluster(
                1000,
                &[
                    simple_block(1, 0, 0x80, b"frame-0"),
                    simple_block(2, 5, 0x80, b"audio-0"),
                    simple_block(1, 40, 0x00, b"frame-1"),
                ],
            ),
        ],
    )
}
