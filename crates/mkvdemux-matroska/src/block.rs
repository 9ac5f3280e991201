//! SimpleBlock and BlockGroup decoding.
//!
//! Block layout:
//!
//! ```text
//! +--------------+-----------------+-------+----------------------+
//! | track (VINT) | timecode (i16)  | flags | lacing + frame data  |
//! +--------------+-----------------+-------+----------------------+
//! ```
//!
//! Only the first frame of a laced block is returned, except for EBML
//! lacing where the whole laced region (size headers included) is kept.

use bytes::Bytes;
use mkvdemux_ebml::vint::{decode_vint, VintMode};
use mkvdemux_ebml::{Element, ElementIter};
use tracing::{debug, trace};

use crate::ids;
use crate::packet::{Packet, PacketFlags};
use crate::{Error, Result};

/// Smallest possible block: 1-byte track, timecode, flags.
const MIN_BLOCK_SIZE: usize = 4;

const FLAG_KEYFRAME: u8 = 0x80;
const FLAG_INVISIBLE: u8 = 0x08;
const FLAG_DISCARDABLE: u8 = 0x01;
const LACING_MASK: u8 = 0x06;

/// Lacing mode from bits 1-2 of the block flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lacing {
    None,
    Xiph,
    Fixed,
    Ebml,
}

impl Lacing {
    pub fn from_flags(flags: u8) -> Self {
        match flags & LACING_MASK {
            0x02 => Self::Fixed,
            0x04 => Self::Ebml,
            0x06 => Self::Xiph,
            _ => Self::None,
        }
    }
}

/// The fixed part of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub track: u64,
    /// Signed offset from the cluster timestamp, in ticks.
    pub timecode: i16,
    pub flags: u8,
    /// Bytes taken by track, timecode and flags.
    pub len: usize,
}

impl BlockHeader {
    /// Parse the header of a block payload starting at absolute `offset`.
    pub fn parse(data: &[u8], offset: u64) -> Result<Self> {
        if data.len() < MIN_BLOCK_SIZE {
            return Err(Error::truncated_block(offset, "shorter than 4 bytes"));
        }

        let (track, n) = decode_vint(data, VintMode::Value)
            .map_err(|_| Error::InvalidTrackNumber { offset })?;
        if n + 3 > data.len() {
            return Err(Error::truncated_block(offset, "header past end of block"));
        }

        Ok(Self {
            track,
            timecode: i16::from_be_bytes([data[n], data[n + 1]]),
            flags: data[n + 2],
            len: n + 3,
        })
    }

    pub fn lacing(&self) -> Lacing {
        Lacing::from_flags(self.flags)
    }
}

/// Convert ticks to milliseconds: `ticks * scale / 1_000_000`.
pub fn ticks_to_ms(ticks: u64, timestamp_scale: u64) -> u64 {
    let ms = ticks as u128 * timestamp_scale as u128 / 1_000_000;
    u64::try_from(ms).unwrap_or(u64::MAX)
}

/// Absolute block time in ticks; negative results clamp to 0.
pub fn absolute_ticks(cluster_timestamp: u64, timecode: i16) -> u64 {
    let ticks = (cluster_timestamp as i128 + timecode as i128).clamp(0, u64::MAX as i128);
    ticks as u64
}

/// Locate the returned frame inside a laced region.
///
/// `laced` starts right after the block header. Returns the frame's start
/// within `laced` and its bytes.
pub fn first_frame(laced: &Bytes, lacing: Lacing, offset: u64) -> Result<(usize, Bytes)> {
    match lacing {
        Lacing::None => Ok((0, laced.clone())),
        Lacing::Fixed => {
            let (frame_count, rest) = split_lace_count(laced, offset)?;
            let frame_size = rest.len() / frame_count;
            Ok((1, rest.slice(..frame_size)))
        }
        Lacing::Ebml => {
            let (_, rest) = split_lace_count(laced, offset)?;
            Ok((1, rest))
        }
        Lacing::Xiph => {
            let (frame_count, rest) = split_lace_count(laced, offset)?;
            let mut pos = 0usize;
            let mut first_size = None;
            for _ in 0..frame_count - 1 {
                let mut size = 0usize;
                loop {
                    let &b = rest
                        .get(pos)
                        .ok_or(Error::truncated_block(offset, "Xiph lace header"))?;
                    pos += 1;
                    size += b as usize;
                    if b != 0xFF {
                        break;
                    }
                }
                first_size.get_or_insert(size);
            }

            let remaining = rest.len() - pos;
            let size = first_size.unwrap_or(remaining);
            if size > remaining {
                return Err(Error::truncated_block(offset, "Xiph frame past end of block"));
            }
            Ok((1 + pos, rest.slice(pos..pos + size)))
        }
    }
}

/// Split off the leading `frame_count - 1` byte of a laced region.
fn split_lace_count(laced: &Bytes, offset: u64) -> Result<(usize, Bytes)> {
    match laced.first() {
        Some(&count_minus_one) => Ok((count_minus_one as usize + 1, laced.slice(1..))),
        None => Err(Error::truncated_block(offset, "missing lace count")),
    }
}

/// Decode a SimpleBlock whose payload starts at absolute `data_offset`.
pub fn decode_simple_block(
    element: &Element,
    data_offset: u64,
    cluster_timestamp: u64,
    timestamp_scale: u64,
) -> Result<Packet> {
    let header = BlockHeader::parse(&element.data, data_offset)?;
    let laced = element.data.slice(header.len..);
    let (start, data) = first_frame(&laced, header.lacing(), data_offset)?;

    let mut flags = PacketFlags::UNKNOWN_END;
    if header.flags & FLAG_KEYFRAME != 0 {
        flags |= PacketFlags::KEYFRAME;
    }
    if header.flags & FLAG_INVISIBLE != 0 {
        flags |= PacketFlags::INVISIBLE;
    }
    if header.flags & FLAG_DISCARDABLE != 0 {
        flags |= PacketFlags::DISCARDABLE;
    }

    let start_ms = ticks_to_ms(
        absolute_ticks(cluster_timestamp, header.timecode),
        timestamp_scale,
    );
    trace!(track = header.track, start_ms, size = data.len(), "SimpleBlock");

    Ok(Packet {
        track: header.track,
        start_ms,
        end_ms: start_ms,
        flags,
        block_flags: header.flags,
        file_pos: data_offset + (header.len + start) as u64,
        data,
    })
}

/// Decode a BlockGroup whose payload starts at absolute `data_offset`.
///
/// The inner Block is taken as-is (no lacing) and always marked as a keyframe.
pub fn decode_block_group(
    element: &Element,
    data_offset: u64,
    cluster_timestamp: u64,
    timestamp_scale: u64,
) -> Result<Packet> {
    let mut block = None;
    let mut duration = 0u64;

    let mut children = ElementIter::new(element.data.clone());
    while let Some(child) = children.next() {
        let child = child?;
        match child.id {
            ids::BLOCK => {
                let child_offset = data_offset + (children.position() - child.data.len()) as u64;
                block = Some((child, child_offset));
            }
            ids::BLOCK_DURATION => duration = child.as_uint(),
            other => debug!(id = %other, "skipping BlockGroup child"),
        }
    }

    let Some((block, block_offset)) = block else {
        return Err(Error::truncated_block(data_offset, "BlockGroup without Block"));
    };

    let header = BlockHeader::parse(&block.data, block_offset)?;
    let ticks = absolute_ticks(cluster_timestamp, header.timecode);
    let start_ms = ticks_to_ms(ticks, timestamp_scale);

    let mut flags = PacketFlags::KEYFRAME;
    let end_ms = if duration > 0 {
        ticks_to_ms(ticks.saturating_add(duration), timestamp_scale)
    } else {
        flags |= PacketFlags::UNKNOWN_END;
        start_ms
    };
    trace!(track = header.track, start_ms, end_ms, "BlockGroup");

    Ok(Packet {
        track: header.track,
        start_ms,
        end_ms,
        flags,
        block_flags: header.flags,
        file_pos: block_offset + header.len as u64,
        data: block.data.slice(header.len..),
    })
}
