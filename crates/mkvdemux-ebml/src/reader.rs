//! Stream reader for EBML elements.

use std::io::{self, Read};

use bytes::Bytes;
use tracing::trace;

use crate::element::{Element, ElementHeader};
use crate::error::{Error, Result};
use crate::source::ByteSource;
use crate::vint::{self, VintMode, MAX_ID_LENGTH, MAX_VINT_LENGTH, UNKNOWN_SIZE};
use crate::ElementId;

/// Default ceiling for buffered element payloads (64 MB).
pub const DEFAULT_MAX_ELEMENT_SIZE: u64 = 64 * 1024 * 1024;

/// Reads EBML elements from a byte source while tracking the absolute position.
///
/// The reader is the only owner of the stream position. Nested payloads are
/// decoded from buffered [`Element`]s with [`crate::ElementIter`] and never
/// move this cursor.
#[derive(Debug)]
pub struct EbmlReader<S> {
    source: S,
    position: u64,
    max_element_size: u64,
}

impl<S: ByteSource> EbmlReader<S> {
    /// Create a reader positioned at offset 0 of `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            position: 0,
            max_element_size: DEFAULT_MAX_ELEMENT_SIZE,
        }
    }

    /// Set the largest payload [`read_element`](Self::read_element) will buffer.
    pub fn with_max_element_size(mut self, max: u64) -> Self {
        self.max_element_size = max;
        self
    }

    /// Absolute offset of the next unread byte.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether the underlying source supports random access.
    pub fn is_seekable(&self) -> bool {
        self.source.is_seekable()
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Read one element header, rejecting the unknown-size sentinel.
    ///
    /// Returns `Ok(None)` when the stream ends exactly at an element boundary.
    /// On success the cursor sits at the first payload byte.
    pub fn read_element_header(&mut self) -> Result<Option<ElementHeader>> {
        match self.read_element_header_lenient()? {
            Some(header) if header.is_unknown_size() => Err(Error::UnsupportedUnknownSize {
                id: header.id,
                offset: header.offset,
            }),
            other => Ok(other),
        }
    }

    /// Read one element header, reporting the unknown-size sentinel as [`UNKNOWN_SIZE`].
    ///
    /// Only container elements whose end is not needed (Segment, Cluster)
    /// should be read this way.
    pub fn read_element_header_lenient(&mut self) -> Result<Option<ElementHeader>> {
        let offset = self.position;

        let Some((id, id_len)) = self.read_vint(VintMode::Identifier, true)? else {
            return Ok(None);
        };
        if id_len > MAX_ID_LENGTH {
            return Err(Error::MalformedVInt { offset });
        }

        let (size, size_len) = self
            .read_vint(VintMode::Value, false)?
            .ok_or(Error::TruncatedInput { offset })?;
        let size = if vint::is_unknown_size(size, size_len) {
            UNKNOWN_SIZE
        } else {
            size
        };

        let header = ElementHeader {
            id: ElementId(id as u32),
            size,
            offset,
            data_offset: self.position,
        };
        trace!(id = %header.id, size = header.size, offset, "element header");
        Ok(Some(header))
    }

    /// Read a complete element: header and payload.
    ///
    /// Returns `Ok(None)` when the stream ends exactly at an element boundary.
    pub fn read_element(&mut self) -> Result<Option<Element>> {
        match self.read_element_header()? {
            Some(header) => self.read_payload(&header).map(Some),
            None => Ok(None),
        }
    }

    /// Read the payload of an element whose header was just consumed.
    pub fn read_payload(&mut self, header: &ElementHeader) -> Result<Element> {
        if header.is_unknown_size() {
            return Err(Error::UnsupportedUnknownSize {
                id: header.id,
                offset: header.offset,
            });
        }
        if header.size > self.max_element_size {
            return Err(Error::ElementTooLarge {
                id: header.id,
                size: header.size,
                max: self.max_element_size,
            });
        }

        let mut data = vec![0u8; header.size as usize];
        self.source
            .read_exact(&mut data)
            .map_err(|e| Error::from_io(e, header.offset))?;
        self.position += header.size;

        Ok(Element {
            id: header.id,
            size: header.size,
            data: Bytes::from(data),
        })
    }

    /// Skip `size` bytes without interpreting them.
    ///
    /// A forward-only source that runs out of bytes is not an error here; the
    /// next header read reports end of stream.
    pub fn skip(&mut self, size: u64) -> Result<()> {
        let skipped = self.source.skip(size).map_err(Error::Io)?;
        self.position = self.position.saturating_add(skipped);
        Ok(())
    }

    /// Skip the payload of an element whose header was just consumed.
    pub fn skip_element(&mut self, header: &ElementHeader) -> Result<()> {
        if header.is_unknown_size() {
            return Err(Error::UnsupportedUnknownSize {
                id: header.id,
                offset: header.offset,
            });
        }
        trace!(id = %header.id, size = header.size, "skipping element");
        self.skip(header.size)
    }

    /// Read one VINT from the stream.
    ///
    /// With `eof_ok`, end of stream before the first byte yields `Ok(None)`.
    fn read_vint(&mut self, mode: VintMode, eof_ok: bool) -> Result<Option<(u64, usize)>> {
        let offset = self.position;
        let mut buf = [0u8; MAX_VINT_LENGTH];

        if !self.read_first_byte(&mut buf[0])? {
            return if eof_ok {
                Ok(None)
            } else {
                Err(Error::TruncatedInput { offset })
            };
        }
        self.position += 1;

        let length = vint::vint_length(buf[0]).ok_or(Error::MalformedVInt { offset })?;
        if length > 1 {
            self.source
                .read_exact(&mut buf[1..length])
                .map_err(|e| Error::from_io(e, offset))?;
            self.position += (length - 1) as u64;
        }

        Ok(Some((vint::accumulate(&buf[..length], mode), length)))
    }

    /// Read a single byte, returning `false` on a clean end of stream.
    fn read_first_byte(&mut self, byte: &mut u8) -> Result<bool> {
        loop {
            match self.source.read(std::slice::from_mut(byte)) {
                Ok(0) => return Ok(false),
                Ok(_) => return Ok(true),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }
}
