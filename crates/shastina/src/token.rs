//! Tokenizer: groups filtered characters into lexical tokens.
//!
//! Tokens are recognized under a fixed stop-character classification:
//!
//! - filler (skipped atomically before every token): space, tab, LF,
//!   and `#` comments through end of line;
//! - atomic tokens, exactly one character: `(` `)` `[` `]` `,` `%` `;`;
//! - inclusive stops, consumed and ending the token: `"` (quoted-string
//!   open), `` ` `` (embed open), `{` (curly-string open);
//! - exclusive stops, pushed back for the next token: filler, atomics
//!   and `#`;
//! - `|` immediately followed by `;` is the two-character final token,
//!   which only filler may follow through true EOF.
//!
//! A token ending in an inclusive stop carries only the *prefix* (the
//! bytes before the delimiter); the payload is read separately through
//! [`Tokenizer::read_quoted`] / [`Tokenizer::read_curlied`]. Token text
//! lives in a buffer reused by the next read, so callers copy out what
//! they keep.

use crate::buffer::GrowableBuffer;
use crate::entity::QuoteKind;
use crate::error::{Error, ErrorKind};
use crate::filter::InputFilter;
use crate::options::ReaderOptions;
use crate::source::ByteSource;
use crate::strings;

/// Lexical classification of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// The `|;` end-of-source token.
    Final,
    /// Any ordinary token, atomics included.
    Simple,
    /// A token ending in `"` or `{`; the caller must read the payload
    /// next.
    StringOpen(QuoteKind),
    /// A token ending in `` ` ``; the embedded payload is the caller's
    /// affair.
    EmbedOpen,
}

/// A transient view of one token.
///
/// Borrows the tokenizer's working buffer and is invalidated by the
/// next `read_token` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Lexical classification.
    pub kind: TokenKind,
    /// Token text; for string/embed opens this is the prefix with the
    /// delimiter stripped.
    pub text: &'a [u8],
    /// 1-based line the token started on.
    pub line: u32,
}

#[derive(Debug)]
enum Status {
    Running,
    /// The final token has been produced; it is re-served without I/O.
    Finished { line: u32 },
    Failed(Error),
}

/// The tokenizer described in the module docs.
#[derive(Debug)]
pub struct Tokenizer<S> {
    filter: InputFilter<S>,
    buf: GrowableBuffer,
    payload: GrowableBuffer,
    status: Status,
    max_curly_depth: u32,
}

const fn is_atomic(byte: u8) -> bool {
    matches!(byte, b'(' | b')' | b'[' | b']' | b',' | b'%' | b';')
}

const fn is_filler(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n')
}

const fn is_exclusive_stop(byte: u8) -> bool {
    is_filler(byte) || is_atomic(byte) || byte == b'#'
}

const fn is_legal(byte: u8) -> bool {
    // Printable ASCII; filler is handled as a stop before this check.
    byte >= 0x21 && byte <= 0x7E
}

impl<S: ByteSource> Tokenizer<S> {
    /// Builds a tokenizer over a byte source.
    ///
    /// # Panics
    ///
    /// Panics if `options` is unusable (see [`ReaderOptions`]).
    #[must_use]
    pub fn new(source: S, options: ReaderOptions) -> Self {
        options.validate();
        Self {
            filter: InputFilter::new(source),
            buf: GrowableBuffer::new(options.initial_token_capacity, options.max_token_length),
            payload: GrowableBuffer::new(
                options.initial_string_capacity,
                options.max_string_length,
            ),
            status: Status::Running,
            max_curly_depth: options.max_curly_depth,
        }
    }

    /// Reads the next token.
    ///
    /// Errors are sticky. After the final token has been produced once,
    /// it is returned again on every further call without touching the
    /// input.
    pub fn read_token(&mut self) -> Result<Token<'_>, Error> {
        match &self.status {
            Status::Failed(err) => return Err(err.clone()),
            Status::Finished { line } => {
                let line = *line;
                return Ok(Token {
                    kind: TokenKind::Final,
                    text: b"|;",
                    line,
                });
            }
            Status::Running => {}
        }
        match self.next_token() {
            Ok((kind, line)) => {
                if kind == TokenKind::Final {
                    self.status = Status::Finished { line };
                    return Ok(Token {
                        kind,
                        text: b"|;",
                        line,
                    });
                }
                Ok(Token {
                    kind,
                    text: self.buf.as_slice(),
                    line,
                })
            }
            Err(err) => {
                self.status = Status::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Reads the payload of a quoted string whose opener the last token
    /// consumed. The returned slice is invalidated by the next
    /// tokenizer call.
    pub fn read_quoted(&mut self) -> Result<&[u8], Error> {
        if let Status::Failed(err) = &self.status {
            return Err(err.clone());
        }
        match strings::read_quoted(&mut self.filter, &mut self.payload) {
            Ok(()) => Ok(self.payload.as_slice()),
            Err(err) => {
                self.status = Status::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Reads the payload of a curly string whose opener the last token
    /// consumed. The returned slice is invalidated by the next
    /// tokenizer call.
    pub fn read_curlied(&mut self) -> Result<&[u8], Error> {
        if let Status::Failed(err) = &self.status {
            return Err(err.clone());
        }
        match strings::read_curlied(&mut self.filter, &mut self.payload, self.max_curly_depth) {
            Ok(()) => Ok(self.payload.as_slice()),
            Err(err) => {
                self.status = Status::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// The filter's 1-based line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.filter.line()
    }

    /// Whether the input began with a UTF-8 byte order mark.
    #[must_use]
    pub const fn had_bom(&self) -> bool {
        self.filter.had_bom()
    }

    /// Access to the input filter (see
    /// [`InputFilter::source_mut`] for the embedded-data caveat).
    pub const fn filter_mut(&mut self) -> &mut InputFilter<S> {
        &mut self.filter
    }

    /// Bytes the underlying source has handed out so far.
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.filter.source().bytes_consumed()
    }

    fn err_here(&self, kind: ErrorKind) -> Error {
        Error::new(kind, self.filter.line())
    }

    /// Skips filler and returns the first significant character, or
    /// `None` at EOF.
    fn next_significant(&mut self) -> Result<Option<u8>, Error> {
        loop {
            match self.filter.read()? {
                None => return Ok(None),
                Some(b'#') => self.skip_comment()?,
                Some(byte) if is_filler(byte) => {}
                Some(byte) => return Ok(Some(byte)),
            }
        }
    }

    /// Consumes through the LF ending a comment. Bytes inside comments
    /// are unrestricted.
    fn skip_comment(&mut self) -> Result<(), Error> {
        loop {
            match self.filter.read()? {
                None | Some(b'\n') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn push_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.buf
            .push(byte)
            .map_err(|_| self.err_here(ErrorKind::TokenTooLong))
    }

    fn next_token(&mut self) -> Result<(TokenKind, u32), Error> {
        self.buf.clear();
        let Some(first) = self.next_significant()? else {
            // A well-formed source ends at `|;`, never at raw EOF.
            return Err(self.err_here(ErrorKind::UnexpectedEof));
        };
        let line = self.filter.line();

        if is_atomic(first) {
            self.push_byte(first)?;
            return Ok((TokenKind::Simple, line));
        }
        match first {
            b'"' => return Ok((TokenKind::StringOpen(QuoteKind::Quoted), line)),
            b'{' => return Ok((TokenKind::StringOpen(QuoteKind::Curly), line)),
            b'`' => return Ok((TokenKind::EmbedOpen, line)),
            b'|' => {
                // Final token only as `|` immediately followed by `;`;
                // any other continuation is an ordinary token.
                match self.filter.read()? {
                    Some(b';') => {
                        self.verify_trailer()?;
                        return Ok((TokenKind::Final, line));
                    }
                    Some(_) => self.filter.pushback(),
                    None => {}
                }
            }
            _ => {}
        }

        if !is_legal(first) {
            return Err(self.err_here(ErrorKind::IllegalCharacter));
        }
        self.push_byte(first)?;
        loop {
            match self.filter.read()? {
                None => break,
                Some(byte) if is_exclusive_stop(byte) => {
                    self.filter.pushback();
                    break;
                }
                Some(b'"') => return Ok((TokenKind::StringOpen(QuoteKind::Quoted), line)),
                Some(b'{') => return Ok((TokenKind::StringOpen(QuoteKind::Curly), line)),
                Some(b'`') => return Ok((TokenKind::EmbedOpen, line)),
                Some(byte) => {
                    if !is_legal(byte) {
                        return Err(self.err_here(ErrorKind::IllegalCharacter));
                    }
                    self.push_byte(byte)?;
                }
            }
        }
        Ok((TokenKind::Simple, line))
    }

    /// After `|;`, only filler may remain through true EOF.
    fn verify_trailer(&mut self) -> Result<(), Error> {
        loop {
            match self.filter.read()? {
                None => return Ok(()),
                Some(b'#') => self.skip_comment()?,
                Some(byte) if is_filler(byte) => {}
                Some(_) => return Err(self.err_here(ErrorKind::TrailerAfterFinalToken)),
            }
        }
    }
}
