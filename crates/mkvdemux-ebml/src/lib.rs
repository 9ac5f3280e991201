//! mkvdemux-ebml: EBML primitives for Matroska and WebM demuxing
//!
//! EBML (Extensible Binary Meta Language) is a binary tag-length-value format.
//! Every element is an ID, a size and a payload, with both ID and size
//! written as variable-length integers.
//!
//! # Modules
//!
//! - `vint` - Variable-length integer decoding and encoding
//! - `element` - Element headers, buffered elements and scalar payload readers
//! - `source` - Random-access and forward-only byte sources
//! - `reader` - Position-tracking element reader over a byte source
//! - `header` - The EBML document header
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use mkvdemux_ebml::{EbmlHeader, EbmlReader, Seekable};
//!
//! let data = [
//!     0x1A, 0x45, 0xDF, 0xA3, 0x87, // EBML, 7 bytes
//!     0x42, 0x82, 0x84, b'w', b'e', b'b', b'm',
//! ];
//! let mut reader = EbmlReader::new(Seekable::new(Cursor::new(&data[..])));
//! let header = EbmlHeader::read(&mut reader).unwrap();
//! assert_eq!(header.doc_type, "webm");
//! ```

pub mod element;
pub mod error;
pub mod header;
pub mod id;
pub mod reader;
pub mod source;
pub mod vint;

pub use element::{Element, ElementHeader, ElementIter};
pub use error::{Error, Result};
pub use header::EbmlHeader;
pub use id::ElementId;
pub use reader::{EbmlReader, DEFAULT_MAX_ELEMENT_SIZE};
pub use source::{ByteSource, Seekable, Streamed};
pub use vint::{VintMode, UNKNOWN_SIZE};
