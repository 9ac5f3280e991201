//! The EBML document header.

use tracing::debug;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::reader::EbmlReader;
use crate::source::ByteSource;
use crate::ElementId;

/// Fields of the EBML header that opens every EBML document.
///
/// Absent children keep the defaults from the EBML standard.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct EbmlHeader {
    pub version: u64,
    pub read_version: u64,
    pub max_id_length: u64,
    pub max_size_length: u64,
    /// Document type, e.g. `matroska` or `webm`.
    pub doc_type: String,
    pub doc_type_version: u64,
    pub doc_type_read_version: u64,
}

impl Default for EbmlHeader {
    fn default() -> Self {
        Self {
            version: 1,
            read_version: 1,
            max_id_length: 4,
            max_size_length: 8,
            doc_type: String::new(),
            doc_type_version: 1,
            doc_type_read_version: 1,
        }
    }
}

impl EbmlHeader {
    /// Read the header element from the current position of `reader`.
    ///
    /// Fails with [`Error::UnexpectedElement`] if the next element is not `EBML`,
    /// and with [`Error::TruncatedInput`] on an empty stream. The ID is checked
    /// before the size or payload of the element is looked at.
    pub fn read<S: ByteSource>(reader: &mut EbmlReader<S>) -> Result<Self> {
        let offset = reader.position();
        let header = reader
            .read_element_header_lenient()?
            .ok_or(Error::TruncatedInput { offset })?;
        if header.id != ElementId::EBML {
            return Err(Error::unexpected(ElementId::EBML, header.id));
        }

        let element = reader.read_payload(&header)?;
        Self::parse(&element)
    }

    /// Decode an already buffered `EBML` element.
    pub fn parse(element: &Element) -> Result<Self> {
        if element.id != ElementId::EBML {
            return Err(Error::unexpected(ElementId::EBML, element.id));
        }

        let mut header = Self::default();
        for child in element.children() {
            let child = child?;
            match child.id {
                ElementId::EBML_VERSION => header.version = child.as_uint(),
                ElementId::EBML_READ_VERSION => header.read_version = child.as_uint(),
                ElementId::EBML_MAX_ID_LENGTH => header.max_id_length = child.as_uint(),
                ElementId::EBML_MAX_SIZE_LENGTH => header.max_size_length = child.as_uint(),
                ElementId::DOC_TYPE => header.doc_type = child.as_string(),
                ElementId::DOC_TYPE_VERSION => header.doc_type_version = child.as_uint(),
                ElementId::DOC_TYPE_READ_VERSION => header.doc_type_read_version = child.as_uint(),
                _ => {}
            }
        }

        debug!(
            doc_type = %header.doc_type,
            doc_type_version = header.doc_type_version,
            "EBML header"
        );
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_defaults_for_missing_children() {
        let element = Element::new(
            ElementId::EBML,
            Bytes::from_static(&[0x42, 0x82, 0x84, b'w', b'e', b'b', b'm']),
        );
        let header = EbmlHeader::parse(&element).unwrap();

        assert_eq!(header.doc_type, "webm");
        assert_eq!(header.version, 1);
        assert_eq!(header.read_version, 1);
        assert_eq!(header.max_id_length, 4);
        assert_eq!(header.max_size_length, 8);
        assert_eq!(header.doc_type_version, 1);
        assert_eq!(header.doc_type_read_version, 1);
    }

    #[test]
    fn test_explicit_values() {
        let element = Element::new(
            ElementId::EBML,
            Bytes::from_static(&[
                0x42, 0x87, 0x81, 0x04, // DocTypeVersion
                0x42, 0x85, 0x81, 0x02, // DocTypeReadVersion
                0x42, 0xF3, 0x81, 0x04, // EBMLMaxSizeLength
                0xEC, 0x81, 0x00, // Void
            ]),
        );
        let header = EbmlHeader::parse(&element).unwrap();

        assert_eq!(header.doc_type_version, 4);
        assert_eq!(header.doc_type_read_version, 2);
        assert_eq!(header.max_size_length, 4);
        assert_eq!(header.doc_type, "");
    }

    #[test]
    fn test_rejects_other_element() {
        let element = Element::new(ElementId(0x18538067), Bytes::new());
        assert!(matches!(
            EbmlHeader::parse(&element),
            Err(Error::UnexpectedElement {
                expected: ElementId::EBML,
                ..
            })
        ));
    }

    fn read_from(data: &'static [u8]) -> Result<EbmlHeader> {
        let mut reader = EbmlReader::new(crate::Streamed::new(data));
        EbmlHeader::read(&mut reader)
    }

    #[test]
    fn test_read_checks_id_before_payload() {
        // Segment with a declared size of 8 but only two payload bytes
        assert!(matches!(
            read_from(&[0x18, 0x53, 0x80, 0x67, 0x88, 0x01, 0x02]),
            Err(Error::UnexpectedElement {
                expected: ElementId::EBML,
                found: ElementId(0x18538067),
            })
        ));

        // Unknown-size Segment
        assert!(matches!(
            read_from(&[0x18, 0x53, 0x80, 0x67, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
            Err(Error::UnexpectedElement { .. })
        ));

        // Oversized Cluster
        assert!(matches!(
            read_from(&[0x1F, 0x43, 0xB6, 0x75, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]),
            Err(Error::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn test_read_valid_header() {
        let header = read_from(&[0x1A, 0x45, 0xDF, 0xA3, 0x84, 0x42, 0x82, 0x81, b'x']).unwrap();
        assert_eq!(header.doc_type, "x");
    }

    #[test]
    fn test_read_unknown_size_ebml_header() {
        assert!(matches!(
            read_from(&[0x1A, 0x45, 0xDF, 0xA3, 0xFF]),
            Err(Error::UnsupportedUnknownSize { .. })
        ));
    }
}
