//! SRT output for UTF-8 text subtitle tracks.

use std::io::{self, Write};

/// UTF-8 byte order mark written at the start of every SRT file.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Format milliseconds as `HH:MM:SS,mmm`.
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = ms % 3_600_000 / 60_000;
    let seconds = ms % 60_000 / 1000;
    let millis = ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format one numbered SRT entry.
///
/// CRLF line endings become LF, and empty text becomes a single space.
pub fn format_entry(index: usize, start_ms: u64, end_ms: u64, text: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(text).replace("\r\n", "\n");
    if text.is_empty() {
        text.push(' ');
    }

    format!(
        "{}\n{} --> {}\n{}\n\n",
        index,
        format_timestamp(start_ms),
        format_timestamp(end_ms),
        text
    )
}

/// Writes packets of one subtitle track as SRT entries numbered from 1.
#[derive(Debug, Default)]
pub struct SrtWriter {
    entries: usize,
}

impl SrtWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_header<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&UTF8_BOM)
    }

    pub fn write_entry<W: Write>(
        &mut self,
        out: &mut W,
        start_ms: u64,
        end_ms: u64,
        text: &[u8],
    ) -> io::Result<()> {
        self.entries += 1;
        out.write_all(format_entry(self.entries, start_ms, end_ms, text).as_bytes())
    }

    /// Number of entries written so far.
    pub fn entries(&self) -> usize {
        self.entries
    }
}
