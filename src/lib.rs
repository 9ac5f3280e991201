//! mkvdemux - Matroska/WebM demuxing tool
//!
//! This library crate exposes the configuration and track extraction used by
//! the `mkvdemux` binary, for integration testing.

pub mod config;
pub mod extract;
