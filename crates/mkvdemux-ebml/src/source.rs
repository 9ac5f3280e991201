//! Byte sources for the stream reader.
//!
//! The same decoding core runs over random-access and forward-only input.
//! The only differences are how payloads are skipped and whether a caller
//! may rely on coming back to a skipped region later.

use std::io::{self, Read, Seek, SeekFrom};

/// A readable input that knows how to skip bytes.
pub trait ByteSource: Read {
    /// Advance past `n` bytes without interpreting them.
    ///
    /// Returns the number of bytes actually skipped, which is smaller than
    /// `n` only when a forward-only source reached end of stream.
    fn skip(&mut self, n: u64) -> io::Result<u64>;

    /// Whether the source supports random access.
    fn is_seekable(&self) -> bool;
}

/// Random-access source over any `Read + Seek`.
#[derive(Debug)]
pub struct Seekable<R> {
    inner: R,
}

impl<R: Read + Seek> Seekable<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for Seekable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Seek> ByteSource for Seekable<R> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let delta = i64::try_from(n).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "skip distance exceeds i64::MAX")
        })?;
        // Seeking past the end is allowed; the next read reports end of stream.
        self.inner.seek(SeekFrom::Current(delta))?;
        Ok(n)
    }

    fn is_seekable(&self) -> bool {
        true
    }
}

/// Forward-only source over any `Read`; skips by reading and discarding.
#[derive(Debug)]
pub struct Streamed<R> {
    inner: R,
}

impl<R: Read> Streamed<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for Streamed<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read> ByteSource for Streamed<R> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        io::copy(&mut (&mut self.inner).take(n), &mut io::sink())
    }

    fn is_seekable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_seekable_skip() {
        let mut source = Seekable::new(Cursor::new(b"hello world".to_vec()));
        assert_eq!(source.skip(6).unwrap(), 6);
        let mut buf = [0u8; 5];
        source.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"world");
        assert!(source.is_seekable());
    }

    #[test]
    fn test_streamed_skip_stops_at_eof() {
        let mut source = Streamed::new(&b"hello"[..]);
        assert_eq!(source.skip(3).unwrap(), 3);
        assert_eq!(source.skip(10).unwrap(), 2);
        assert!(!source.is_seekable());

        let mut buf = [0u8; 1];
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }
}
