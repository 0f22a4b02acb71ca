//! Input normalization filter.
//!
//! Sits between a raw [`ByteSource`] and the tokenizer and guarantees a
//! clean logical character stream:
//!
//! - a leading UTF-8 byte order mark is stripped (and remembered);
//! - CR, LF, CR+LF and LF+CR all collapse to a single LF;
//! - the stream always ends with an LF before EOF, synthesizing one if
//!   the raw input lacked it;
//! - a 1-based line counter tracks emitted LFs, saturating at
//!   `u32::MAX`;
//! - exactly one character of pushback is available.
//!
//! EOF and errors are sticky: once reported, further reads return the
//! identical result without touching the source.

use crate::error::{Error, ErrorKind};
use crate::source::ByteSource;

const LF: u8 = 0x0A;
const CR: u8 = 0x0D;

/// UTF-8 byte order mark continuation after the 0xEF lead byte.
const BOM_TAIL: [u8; 2] = [0xBB, 0xBF];

#[derive(Debug, Clone)]
enum Status {
    Running,
    Eof,
    Failed(Error),
}

/// The normalized character stream described in the module docs.
///
/// # Examples
///
/// ```
/// use shastina::{InputFilter, SliceSource};
///
/// let mut filter = InputFilter::new(SliceSource::new(b"a\r\nb"));
/// assert_eq!(filter.read(), Ok(Some(b'a')));
/// assert_eq!(filter.read(), Ok(Some(b'\n')));
/// assert_eq!(filter.read(), Ok(Some(b'b')));
/// // Synthesized final line break.
/// assert_eq!(filter.read(), Ok(Some(b'\n')));
/// assert_eq!(filter.read(), Ok(None));
/// ```
#[derive(Debug)]
pub struct InputFilter<S> {
    source: S,
    status: Status,
    /// One raw byte of lookahead left over from pair collapsing or the
    /// BOM probe.
    pending: Option<u8>,
    /// Latched once the source reports EOF so it is never read again.
    raw_eof: bool,
    started: bool,
    bom: bool,
    /// Most recent logical character handed out; redelivered by
    /// pushback.
    last: Option<u8>,
    pushed_back: bool,
    line: u32,
}

impl<S: ByteSource> InputFilter<S> {
    /// Wraps a byte source.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            status: Status::Running,
            pending: None,
            raw_eof: false,
            started: false,
            bom: false,
            last: None,
            pushed_back: false,
            line: 1,
        }
    }

    /// Reads the next logical character. `Ok(None)` is EOF.
    ///
    /// Both EOF and errors are sticky.
    pub fn read(&mut self) -> Result<Option<u8>, Error> {
        match &self.status {
            Status::Failed(err) => return Err(err.clone()),
            Status::Eof => return Ok(None),
            Status::Running => {}
        }
        if self.pushed_back {
            self.pushed_back = false;
            return Ok(Some(self.last.expect("pushback without a prior read")));
        }
        if !self.started {
            self.started = true;
            if let Err(kind) = self.probe_bom() {
                return Err(self.fail(kind));
            }
        }
        match self.next_logical() {
            Ok(Some(ch)) => {
                if ch == LF {
                    self.line = self.line.saturating_add(1);
                }
                self.last = Some(ch);
                Ok(Some(ch))
            }
            Ok(None) => {
                if self.last == Some(LF) {
                    self.status = Status::Eof;
                    Ok(None)
                } else {
                    // The raw input did not end with a line break.
                    self.line = self.line.saturating_add(1);
                    self.last = Some(LF);
                    Ok(Some(LF))
                }
            }
            Err(kind) => Err(self.fail(kind)),
        }
    }

    /// Makes the most recent character readable again.
    ///
    /// The line counter is not rewound; around a line break the
    /// reported line may be off by one until the character is re-read.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been read yet, if a pushback is already
    /// pending, or after EOF or an error — all caller contract
    /// violations.
    pub fn pushback(&mut self) {
        assert!(
            matches!(self.status, Status::Running),
            "pushback after EOF or error"
        );
        assert!(self.last.is_some(), "pushback before any read");
        assert!(!self.pushed_back, "pushback already pending");
        self.pushed_back = true;
    }

    /// The 1-based line number, saturating at `u32::MAX`.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Whether the input began with a UTF-8 byte order mark.
    ///
    /// Meaningful only after the first call to [`InputFilter::read`].
    #[must_use]
    pub const fn had_bom(&self) -> bool {
        self.bom
    }

    /// Shared access to the underlying source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the underlying source.
    ///
    /// Reading through this handle bypasses normalization and the
    /// filter's bookkeeping; it is intended for consuming embedded data
    /// after an `Embedded` entity, where framing is application-defined.
    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Returns the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }

    fn fail(&mut self, kind: ErrorKind) -> Error {
        let err = Error::new(kind, self.line);
        self.status = Status::Failed(err.clone());
        err
    }

    /// First-read probe: strip a complete BOM, reject a corrupt one,
    /// pass anything else through untouched.
    fn probe_bom(&mut self) -> Result<(), ErrorKind> {
        match self.next_raw()? {
            Some(0xEF) => {
                for expected in BOM_TAIL {
                    if self.next_raw()? != Some(expected) {
                        return Err(ErrorKind::BadByteOrderMark);
                    }
                }
                self.bom = true;
                Ok(())
            }
            Some(byte) => {
                self.pending = Some(byte);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn next_raw(&mut self) -> Result<Option<u8>, ErrorKind> {
        if let Some(byte) = self.pending.take() {
            return Ok(Some(byte));
        }
        if self.raw_eof {
            return Ok(None);
        }
        match self.source.read_byte() {
            Ok(Some(byte)) => Ok(Some(byte)),
            Ok(None) => {
                self.raw_eof = true;
                Ok(None)
            }
            Err(_) => Err(ErrorKind::Io),
        }
    }

    fn next_logical(&mut self) -> Result<Option<u8>, ErrorKind> {
        match self.next_raw()? {
            Some(byte @ (CR | LF)) => {
                // CR+LF and LF+CR collapse; an unpaired partner byte is
                // kept for the next call.
                let partner = if byte == CR { LF } else { CR };
                match self.next_raw()? {
                    Some(next) if next == partner => {}
                    Some(next) => self.pending = Some(next),
                    None => {}
                }
                Ok(Some(LF))
            }
            other => Ok(other),
        }
    }
}
