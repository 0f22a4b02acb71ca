//! String-literal sub-reader.
//!
//! Both readers assume the opening delimiter has already been consumed
//! and accumulate the raw payload up to (and consuming) the matching
//! closer, which is excluded from the payload. A backslash shields
//! exactly the next byte from delimiter handling; both bytes land in
//! the payload untouched — escape decoding is a downstream concern.

use crate::buffer::GrowableBuffer;
use crate::error::{Error, ErrorKind};
use crate::filter::InputFilter;
use crate::source::ByteSource;

/// Reads a `"` ... `"` payload into `buf`.
pub(crate) fn read_quoted<S: ByteSource>(
    filter: &mut InputFilter<S>,
    buf: &mut GrowableBuffer,
) -> Result<(), Error> {
    buf.clear();
    let mut escaped = false;
    loop {
        let Some(byte) = filter.read()? else {
            return Err(Error::new(ErrorKind::UnterminatedString, filter.line()));
        };
        if byte == 0 {
            return Err(Error::new(ErrorKind::NulByteInString, filter.line()));
        }
        if escaped {
            escaped = false;
            push(buf, byte, filter.line())?;
            continue;
        }
        match byte {
            b'\\' => {
                escaped = true;
                push(buf, byte, filter.line())?;
            }
            b'"' => return Ok(()),
            _ => push(buf, byte, filter.line())?,
        }
    }
}

/// Reads a `{` ... `}` payload into `buf`, honoring brace nesting.
pub(crate) fn read_curlied<S: ByteSource>(
    filter: &mut InputFilter<S>,
    buf: &mut GrowableBuffer,
    max_depth: u32,
) -> Result<(), Error> {
    buf.clear();
    let mut depth: u32 = 1;
    let mut escaped = false;
    loop {
        let Some(byte) = filter.read()? else {
            return Err(Error::new(ErrorKind::UnterminatedString, filter.line()));
        };
        if byte == 0 {
            return Err(Error::new(ErrorKind::NulByteInString, filter.line()));
        }
        if escaped {
            escaped = false;
            push(buf, byte, filter.line())?;
            continue;
        }
        match byte {
            b'\\' => {
                escaped = true;
                push(buf, byte, filter.line())?;
            }
            b'{' => {
                if depth >= max_depth {
                    return Err(Error::new(ErrorKind::CurlyNestingTooDeep, filter.line()));
                }
                depth += 1;
                push(buf, byte, filter.line())?;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
                push(buf, byte, filter.line())?;
            }
            _ => push(buf, byte, filter.line())?,
        }
    }
}

#[inline]
fn push(buf: &mut GrowableBuffer, byte: u8, line: u32) -> Result<(), Error> {
    buf.push(byte)
        .map_err(|_| Error::new(ErrorKind::StringTooLong, line))
}
