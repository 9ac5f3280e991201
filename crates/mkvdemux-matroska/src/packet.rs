//! Demuxed media packets.

use std::fmt;

use bitflags::bitflags;
use bytes::Bytes;

bitflags! {
    /// Per-packet flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PacketFlags: u8 {
        const KEYFRAME = 0x01;
        const INVISIBLE = 0x02;
        const DISCARDABLE = 0x04;
        /// No explicit duration was stored; `end_ms` equals `start_ms`.
        const UNKNOWN_END = 0x08;
    }
}

impl fmt::Display for PacketFlags {
    /// Compact form: `K` keyframe, `I` invisible, `D` discardable, `U` unknown end.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::KEYFRAME, 'K'),
            (Self::INVISIBLE, 'I'),
            (Self::DISCARDABLE, 'D'),
            (Self::UNKNOWN_END, 'U'),
        ];
        for (flag, c) in names {
            if self.contains(flag) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// One demuxed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Track number (not index) the frame belongs to.
    pub track: u64,
    pub start_ms: u64,
    /// Equal to `start_ms` unless the block carried a duration.
    pub end_ms: u64,
    pub flags: PacketFlags,
    /// Raw flags byte of the block header.
    pub block_flags: u8,
    /// Absolute offset of the frame data in the input.
    pub file_pos: u64,
    pub data: Bytes,
}

impl Packet {
    pub fn is_keyframe(&self) -> bool {
        self.flags.contains(PacketFlags::KEYFRAME)
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}
