//! Element identifiers.

/// An EBML element ID with its length-marker bits retained.
///
/// Because the marker is kept, `0x81` (1 byte) and `0x4001` (2 bytes) are
/// different IDs even though they carry the same numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(pub u32);

impl ElementId {
    pub const EBML: Self = Self(0x1A45DFA3);
    pub const EBML_VERSION: Self = Self(0x4286);
    pub const EBML_READ_VERSION: Self = Self(0x42F7);
    pub const EBML_MAX_ID_LENGTH: Self = Self(0x42F2);
    pub const EBML_MAX_SIZE_LENGTH: Self = Self(0x42F3);
    pub const DOC_TYPE: Self = Self(0x4282);
    pub const DOC_TYPE_VERSION: Self = Self(0x4287);
    pub const DOC_TYPE_READ_VERSION: Self = Self(0x4285);

    /// Padding element, valid anywhere.
    pub const VOID: Self = Self(0xEC);
    /// CRC-32 element, valid as first child of any master element.
    pub const CRC32: Self = Self(0xBF);
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
