//! EBML variable-length integers.
//!
//! The length of a VINT is encoded by the position of the most significant
//! set bit of its first byte:
//!
//! ```text
//! 1xxxxxxx                    1 byte,  7 value bits
//! 01xxxxxx xxxxxxxx           2 bytes, 14 value bits
//! 001xxxxx xxxxxxxx xxxxxxxx  3 bytes, 21 value bits
//! ...
//! 00000001 xxxxxxxx (x7)      8 bytes, 56 value bits
//! ```
//!
//! Element sizes are read in [`VintMode::Value`] (marker stripped). Element
//! IDs are read in [`VintMode::Identifier`] (marker kept), because the marker
//! is part of the ID's canonical byte representation.

use crate::error::{Error, Result};

/// Maximum VINT length in bytes.
pub const MAX_VINT_LENGTH: usize = 8;

/// Maximum element ID length in bytes.
pub const MAX_ID_LENGTH: usize = 4;

/// Size reported for elements that declare the "unknown size" sentinel.
pub const UNKNOWN_SIZE: u64 = u64::MAX;

/// Largest value [`encode_vint`] can represent without colliding with the sentinel.
pub const MAX_ENCODABLE: u64 = (1 << 56) - 2;

/// How the length marker of the first byte is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VintMode {
    /// Strip the marker bit (element sizes, track numbers).
    Value,
    /// Keep the marker bit (element IDs).
    Identifier,
}

/// Total VINT length announced by a first byte, or `None` for `0x00`.
pub fn vint_length(first: u8) -> Option<usize> {
    if first == 0 {
        None
    } else {
        Some(first.leading_zeros() as usize + 1)
    }
}

/// Decode a VINT from the start of `data`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_vint(data: &[u8], mode: VintMode) -> Result<(u64, usize)> {
    decode_vint_at(data, 0, mode)
}

/// Decode a VINT starting at `offset` within `data`.
///
/// Errors carry `offset` so nested readers can report where decoding failed.
pub fn decode_vint_at(data: &[u8], offset: usize, mode: VintMode) -> Result<(u64, usize)> {
    let first = *data
        .get(offset)
        .ok_or(Error::TruncatedInput { offset: offset as u64 })?;
    let length = vint_length(first).ok_or(Error::MalformedVInt {
        offset: offset as u64,
    })?;

    let end = offset + length;
    if end > data.len() {
        return Err(Error::TruncatedInput {
            offset: offset as u64,
        });
    }

    Ok((accumulate(&data[offset..end], mode), length))
}

/// Fold the bytes of a complete VINT into its value.
pub(crate) fn accumulate(bytes: &[u8], mode: VintMode) -> u64 {
    let length = bytes.len();
    let first = match mode {
        VintMode::Identifier => bytes[0] as u64,
        // For an 8-byte VINT the mask is zero: the first byte carries no value bits.
        VintMode::Value => (bytes[0] & 0xFFu8.checked_shr(length as u32).unwrap_or(0)) as u64,
    };

    bytes[1..]
        .iter()
        .fold(first, |acc, &b| (acc << 8) | b as u64)
}

/// Whether `value` is the all-ones "unknown size" pattern for a VINT of `length` bytes.
pub fn is_unknown_size(value: u64, length: usize) -> bool {
    (1..=MAX_VINT_LENGTH).contains(&length) && value == (1u64 << (7 * length)) - 1
}

/// Encode `value` using the shortest VINT that does not collide with the sentinel.
///
/// Returns `None` for values above [`MAX_ENCODABLE`].
pub fn encode_vint(value: u64) -> Option<Vec<u8>> {
    let length = (1..=MAX_VINT_LENGTH).find(|&len| value < (1u64 << (7 * len)) - 1)?;
    encode_vint_with_length(value, length)
}

/// Encode `value` as a VINT of exactly `length` bytes.
///
/// The all-ones sentinel is allowed here, so this can produce unknown-size markers.
pub fn encode_vint_with_length(value: u64, length: usize) -> Option<Vec<u8>> {
    if !(1..=MAX_VINT_LENGTH).contains(&length) || value >= 1u64 << (7 * length) {
        return None;
    }

    let mut bytes = value.to_be_bytes()[MAX_VINT_LENGTH - length..].to_vec();
    bytes[0] |= 0x80 >> (length - 1);
    Some(bytes)
}

/// The unknown-size marker for a size field of `length` bytes.
pub fn unknown_size_marker(length: usize) -> Option<Vec<u8>> {
    if !(1..=MAX_VINT_LENGTH).contains(&length) {
        return None;
    }
    encode_vint_with_length((1u64 << (7 * length)) - 1, length)
}
