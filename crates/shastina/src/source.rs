//! Byte sources feeding the input filter.
//!
//! A [`ByteSource`] is a sequential byte provider. EOF and I/O failure
//! are reported as values, never as panics: `Ok(None)` is end of input
//! and [`SourceError`] is the I/O sentinel. Sources may optionally
//! support rewinding for multipass consumers; the parser itself never
//! rewinds — a client performing multiple passes rewinds the source and
//! builds a fresh reader on top of it.

use thiserror::Error;

/// The I/O failure sentinel reported by [`ByteSource::read_byte`].
///
/// Deliberately carries no payload: the parsing layers only need to
/// know that the source failed. Adapters that can say more (such as
/// [`ReadSource`]) retain the underlying error for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Byte source read failure")]
pub struct SourceError;

/// Sequential byte provider consumed by the input filter.
pub trait ByteSource {
    /// Reads the next byte. `Ok(None)` is end of input.
    ///
    /// After EOF or an error has been reported once, implementations
    /// must keep returning the same result on further calls.
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError>;

    /// Rewinds to the beginning of the stream, returning `true` on
    /// success. Sources that cannot rewind return `false` (the
    /// default).
    fn rewind(&mut self) -> bool {
        false
    }

    /// Total number of bytes handed out so far.
    fn bytes_consumed(&self) -> u64;
}

/// A rewindable [`ByteSource`] over an in-memory byte slice.
///
/// # Examples
///
/// ```
/// use shastina::{ByteSource, SliceSource};
///
/// let mut src = SliceSource::new(b"ab");
/// assert_eq!(src.read_byte(), Ok(Some(b'a')));
/// assert_eq!(src.read_byte(), Ok(Some(b'b')));
/// assert_eq!(src.read_byte(), Ok(None));
/// assert!(src.rewind());
/// assert_eq!(src.read_byte(), Ok(Some(b'a')));
/// ```
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Wraps a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl<'a> From<&'a [u8]> for SliceSource<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<'a> From<&'a str> for SliceSource<'a> {
    fn from(data: &'a str) -> Self {
        Self::new(data.as_bytes())
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    fn rewind(&mut self) -> bool {
        self.pos = 0;
        true
    }

    fn bytes_consumed(&self) -> u64 {
        self.pos as u64
    }
}

/// A [`ByteSource`] adapting any [`std::io::Read`].
///
/// Reads one byte per call; wrap slow readers in a
/// [`std::io::BufReader`]. When the reader fails, the adapter reports
/// the [`SourceError`] sentinel and keeps the underlying
/// [`std::io::Error`] available through [`ReadSource::last_error`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
    consumed: u64,
    last_error: Option<std::io::Error>,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ReadSource<R> {
    /// Wraps a reader.
    pub const fn new(inner: R) -> Self {
        Self {
            inner,
            consumed: 0,
            last_error: None,
        }
    }

    /// The I/O error behind the most recent [`SourceError`], if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&std::io::Error> {
        self.last_error.as_ref()
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for ReadSource<R> {
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        if self.last_error.is_some() {
            return Err(SourceError);
        }
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.consumed += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.last_error = Some(e);
                    return Err(SourceError);
                }
            }
        }
    }

    fn bytes_consumed(&self) -> u64 {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_reports_consumed() {
        let mut src = SliceSource::new(b"xyz");
        assert_eq!(src.bytes_consumed(), 0);
        let _ = src.read_byte();
        let _ = src.read_byte();
        assert_eq!(src.bytes_consumed(), 2);
    }

    #[test]
    fn slice_source_eof_is_sticky() {
        let mut src = SliceSource::new(b"");
        assert_eq!(src.read_byte(), Ok(None));
        assert_eq!(src.read_byte(), Ok(None));
    }

    #[cfg(feature = "std")]
    #[test]
    fn read_source_adapts_cursor() {
        let mut src = ReadSource::new(std::io::Cursor::new(b"ok".to_vec()));
        assert_eq!(src.read_byte(), Ok(Some(b'o')));
        assert_eq!(src.read_byte(), Ok(Some(b'k')));
        assert_eq!(src.read_byte(), Ok(None));
        assert_eq!(src.bytes_consumed(), 2);
        assert!(src.last_error().is_none());
    }

    #[cfg(feature = "std")]
    #[test]
    fn read_source_surfaces_io_failure() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk on fire"))
            }
        }

        let mut src = ReadSource::new(Broken);
        assert_eq!(src.read_byte(), Err(SourceError));
        assert!(src.last_error().is_some());
        // Sticky: the source does not retry the reader.
        assert_eq!(src.read_byte(), Err(SourceError));
    }
}
