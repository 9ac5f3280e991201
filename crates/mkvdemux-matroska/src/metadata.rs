//! Entry types for segment-level indexes and metadata.
//!
//! Cues, Chapters, Tags and Attachments are located but not decoded; the
//! demuxer exposes them as empty lists.

/// One seek point from the Cues element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CuePoint {
    pub time: u64,
    pub track: u64,
    /// Cluster position relative to the segment data start.
    pub cluster_position: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Chapter {
    pub uid: u64,
    pub start: u64,
    pub end: Option<u64>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    /// Absolute offset of the attached data.
    pub data_offset: u64,
    pub size: u64,
}
