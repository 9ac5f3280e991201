//! Decoded elements and scalar payload interpretation.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::vint::{self, VintMode, MAX_ID_LENGTH, UNKNOWN_SIZE};
use crate::ElementId;

/// Parsed element header (ID and size) without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHeader {
    /// Element ID.
    pub id: ElementId,
    /// Declared payload size, [`UNKNOWN_SIZE`] for the sentinel.
    pub size: u64,
    /// Absolute offset of the first ID byte.
    pub offset: u64,
    /// Absolute offset of the first payload byte.
    pub data_offset: u64,
}

impl ElementHeader {
    /// Whether the element declared the "unknown size" sentinel.
    pub fn is_unknown_size(&self) -> bool {
        self.size == UNKNOWN_SIZE
    }

    /// Offset one past the payload; saturates for unknown sizes.
    pub fn end(&self) -> u64 {
        self.data_offset.saturating_add(self.size)
    }
}

/// One EBML tag-length-value node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element ID.
    pub id: ElementId,
    /// Declared payload size.
    pub size: u64,
    /// Raw payload; always `size` bytes long.
    pub data: Bytes,
}

impl Element {
    /// Create an element from an ID and its payload.
    pub fn new(id: ElementId, data: Bytes) -> Self {
        Self {
            id,
            size: data.len() as u64,
            data,
        }
    }

    /// Payload as a big-endian unsigned integer.
    pub fn as_uint(&self) -> u64 {
        read_uint(&self.data)
    }

    /// Payload as a big-endian two's complement signed integer.
    pub fn as_int(&self) -> i64 {
        read_int(&self.data)
    }

    /// Payload as an IEEE-754 float (4 or 8 bytes).
    pub fn as_float(&self) -> f64 {
        read_float(&self.data)
    }

    /// Payload as a string with one trailing NUL removed.
    pub fn as_string(&self) -> String {
        read_string(&self.data)
    }

    /// Raw payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterate over the child elements of this (master) element.
    pub fn children(&self) -> ElementIter {
        ElementIter::new(self.data.clone())
    }
}

/// Big-endian unsigned integer of any length; empty data reads as 0.
pub fn read_uint(data: &[u8]) -> u64 {
    data.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

/// Big-endian signed integer, sign-extended from the first byte.
pub fn read_int(data: &[u8]) -> i64 {
    if data.is_empty() {
        return 0;
    }

    let raw = read_uint(data);
    if data[0] & 0x80 == 0 {
        return raw as i64;
    }

    match data.len() {
        1 => raw as u8 as i8 as i64,
        2 => raw as u16 as i16 as i64,
        4 => raw as u32 as i32 as i64,
        8 => raw as i64,
        len if len < 8 => {
            let mask = (1u64 << (len * 8 - 1)) - 1;
            -(((!raw & mask) + 1) as i64)
        }
        // Longer payloads keep only the low 64 bits.
        _ => raw as i64,
    }
}

/// Big-endian IEEE-754 float; lengths other than 4 or 8 read as 0.0.
pub fn read_float(data: &[u8]) -> f64 {
    match data.len() {
        4 => f32::from_be_bytes([data[0], data[1], data[2], data[3]]) as f64,
        8 => f64::from_be_bytes([
            data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
        ]),
        _ => 0.0,
    }
}

/// UTF-8 string with exactly one trailing NUL stripped if present.
pub fn read_string(data: &[u8]) -> String {
    let data = data.strip_suffix(&[0]).unwrap_or(data);
    String::from_utf8_lossy(data).into_owned()
}

/// Iterator over the children of a bounded master-element payload.
///
/// Children are zero-copy slices of the parent buffer. Iteration stops at
/// the end of the buffer, or after the first error.
#[derive(Debug, Clone)]
pub struct ElementIter {
    data: Bytes,
    pos: usize,
}

impl ElementIter {
    /// Iterate over the elements contained in `data`.
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next element within the parent payload.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn read_next(&mut self) -> Result<Element> {
        let start = self.pos;
        let (id, id_len) = vint::decode_vint_at(&self.data, start, VintMode::Identifier)?;
        if id_len > MAX_ID_LENGTH {
            return Err(Error::MalformedVInt {
                offset: start as u64,
            });
        }
        let id = ElementId(id as u32);

        let size_at = start + id_len;
        let (size, size_len) = vint::decode_vint_at(&self.data, size_at, VintMode::Value)?;
        if vint::is_unknown_size(size, size_len) {
            return Err(Error::UnsupportedUnknownSize {
                id,
                offset: start as u64,
            });
        }

        let data_at = size_at + size_len;
        let remaining = (self.data.len() - data_at) as u64;
        if size > remaining {
            return Err(Error::TruncatedInput {
                offset: start as u64,
            });
        }

        let end = data_at + size as usize;
        self.pos = end;
        Ok(Element {
            id,
            size,
            data: self.data.slice(data_at..end),
        })
    }
}

impl Iterator for ElementIter {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }

        let result = self.read_next();
        if result.is_err() {
            self.pos = self.data.len();
        }
        Some(result)
    }
}
