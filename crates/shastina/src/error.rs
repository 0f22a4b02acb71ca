//! Error taxonomy for the parsing pipeline.
//!
//! Every recoverable defect maps to one [`ErrorKind`] with a stable
//! negative integer code, so downstream consumers can match on codes
//! across language boundaries. Contract violations (double pushback,
//! desynchronized stacks) are panics, not `ErrorKind`s — they indicate a
//! bug in the caller or in this crate, never malformed input.

use core::fmt;

use thiserror::Error;

/// Flat classification of every recoverable parse failure.
///
/// Each kind carries a stable negative code, available through
/// [`ErrorKind::code`] and reversible through [`ErrorKind::from_code`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The underlying byte source reported a read failure.
    Io,
    /// The source ended before the `|;` final token.
    UnexpectedEof,
    /// The source began with a corrupt UTF-8 byte order mark.
    BadByteOrderMark,
    /// A byte outside printable ASCII appeared in a token.
    IllegalCharacter,
    /// A token exceeded the configured maximum length.
    TokenTooLong,
    /// Something other than whitespace or comments followed `|;`.
    TrailerAfterFinalToken,
    /// The source ended inside a string literal.
    UnterminatedString,
    /// A string payload exceeded the configured maximum length.
    StringTooLong,
    /// A NUL byte appeared inside a string literal.
    NulByteInString,
    /// Curly braces nested beyond the configured ceiling.
    CurlyNestingTooDeep,
    /// Arrays nested beyond the configured ceiling.
    ArrayNestingTooDeep,
    /// An array accumulated more elements than the configured ceiling.
    ArrayTooManyElements,
    /// Parenthesis groups nested beyond the configured ceiling.
    GroupNestingTooDeep,
    /// A `)` with no matching `(` in the current scope.
    UnmatchedRightParen,
    /// A `]` with no open array.
    UnmatchedRightBracket,
    /// A `,` outside of any open array.
    CommaOutsideArray,
    /// A `,` or `]` was reached with an unclosed `(` group in the
    /// current array element.
    OpenGroupAtArrayBoundary,
    /// A `%` inside an already-open metacommand.
    MetacommandNesting,
    /// A `;` with no open metacommand.
    SemicolonOutsideMetacommand,
    /// Embedded data opened inside a metacommand.
    EmbedInsideMetacommand,
    /// The final token was reached with a metacommand still open.
    UnclosedMetacommandAtEof,
    /// The final token was reached with an array still open.
    UnclosedArrayAtEof,
    /// The final token was reached with a `(` group still open.
    UnclosedGroupAtEof,
}

impl ErrorKind {
    /// The stable negative code for this kind.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Io => -1,
            Self::UnexpectedEof => -2,
            Self::BadByteOrderMark => -3,
            Self::IllegalCharacter => -4,
            Self::TokenTooLong => -5,
            Self::TrailerAfterFinalToken => -6,
            Self::UnterminatedString => -7,
            Self::StringTooLong => -8,
            Self::NulByteInString => -9,
            Self::CurlyNestingTooDeep => -10,
            Self::ArrayNestingTooDeep => -11,
            Self::ArrayTooManyElements => -12,
            Self::GroupNestingTooDeep => -13,
            Self::UnmatchedRightParen => -14,
            Self::UnmatchedRightBracket => -15,
            Self::CommaOutsideArray => -16,
            Self::OpenGroupAtArrayBoundary => -17,
            Self::MetacommandNesting => -18,
            Self::SemicolonOutsideMetacommand => -19,
            Self::EmbedInsideMetacommand => -20,
            Self::UnclosedMetacommandAtEof => -21,
            Self::UnclosedArrayAtEof => -22,
            Self::UnclosedGroupAtEof => -23,
        }
    }

    /// The inverse of [`ErrorKind::code`].
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            -1 => Self::Io,
            -2 => Self::UnexpectedEof,
            -3 => Self::BadByteOrderMark,
            -4 => Self::IllegalCharacter,
            -5 => Self::TokenTooLong,
            -6 => Self::TrailerAfterFinalToken,
            -7 => Self::UnterminatedString,
            -8 => Self::StringTooLong,
            -9 => Self::NulByteInString,
            -10 => Self::CurlyNestingTooDeep,
            -11 => Self::ArrayNestingTooDeep,
            -12 => Self::ArrayTooManyElements,
            -13 => Self::GroupNestingTooDeep,
            -14 => Self::UnmatchedRightParen,
            -15 => Self::UnmatchedRightBracket,
            -16 => Self::CommaOutsideArray,
            -17 => Self::OpenGroupAtArrayBoundary,
            -18 => Self::MetacommandNesting,
            -19 => Self::SemicolonOutsideMetacommand,
            -20 => Self::EmbedInsideMetacommand,
            -21 => Self::UnclosedMetacommandAtEof,
            -22 => Self::UnclosedArrayAtEof,
            -23 => Self::UnclosedGroupAtEof,
            _ => return None,
        })
    }

    /// Human-readable description, capitalized, no trailing punctuation.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Io => "I/O error",
            Self::UnexpectedEof => "Unexpected end of input",
            Self::BadByteOrderMark => "Corrupt byte order mark",
            Self::IllegalCharacter => "Illegal character",
            Self::TokenTooLong => "Token is too long",
            Self::TrailerAfterFinalToken => "Content after final token",
            Self::UnterminatedString => "Unterminated string literal",
            Self::StringTooLong => "String literal is too long",
            Self::NulByteInString => "Nul byte in string literal",
            Self::CurlyNestingTooDeep => "Curly nesting is too deep",
            Self::ArrayNestingTooDeep => "Array nesting is too deep",
            Self::ArrayTooManyElements => "Too many array elements",
            Self::GroupNestingTooDeep => "Group nesting is too deep",
            Self::UnmatchedRightParen => "Unmatched right parenthesis",
            Self::UnmatchedRightBracket => "Unmatched right bracket",
            Self::CommaOutsideArray => "Comma used outside of array",
            Self::OpenGroupAtArrayBoundary => "Open group at array boundary",
            Self::MetacommandNesting => "Metacommand within metacommand",
            Self::SemicolonOutsideMetacommand => "Semicolon used outside of metacommand",
            Self::EmbedInsideMetacommand => "Embedded data within metacommand",
            Self::UnclosedMetacommandAtEof => "Unclosed metacommand at end of source",
            Self::UnclosedArrayAtEof => "Unclosed array at end of source",
            Self::UnclosedGroupAtEof => "Unclosed group at end of source",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl core::error::Error for ErrorKind {}

/// Looks up the message for a stable error code.
///
/// Returns `"Unknown error"` for codes outside the taxonomy. The lookup
/// is pure: it never allocates and never fails.
///
/// # Examples
///
/// ```
/// use shastina::{error_message, ErrorKind};
///
/// assert_eq!(error_message(ErrorKind::UnmatchedRightParen.code()), "Unmatched right parenthesis");
/// assert_eq!(error_message(0), "Unknown error");
/// assert_eq!(error_message(-9999), "Unknown error");
/// ```
#[must_use]
pub const fn error_message(code: i32) -> &'static str {
    match ErrorKind::from_code(code) {
        Some(kind) => kind.message(),
        None => "Unknown error",
    }
}

/// A parse failure: the kind of defect plus the 1-based line it was
/// detected on.
///
/// Once any layer returns an `Error`, that layer and every layer above
/// it is sticky: all further calls return an identical value without
/// touching the underlying source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}")]
pub struct Error {
    kind: ErrorKind,
    line: u32,
}

impl Error {
    pub(crate) const fn new(kind: ErrorKind, line: u32) -> Self {
        Self { kind, line }
    }

    /// The kind of defect.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The stable negative code for this error's kind.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.kind.code()
    }

    /// The 1-based line number the defect was detected on.
    ///
    /// Saturates at `u32::MAX` for pathologically long inputs.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in -23..=-1 {
            let kind = ErrorKind::from_code(code).expect("code in range");
            assert_eq!(kind.code(), code);
        }
        assert_eq!(ErrorKind::from_code(0), None);
        assert_eq!(ErrorKind::from_code(1), None);
        assert_eq!(ErrorKind::from_code(-24), None);
    }

    #[test]
    fn messages_are_capitalized_without_trailing_punctuation() {
        for code in -23..=-1 {
            let msg = error_message(code);
            let first = msg.chars().next().expect("nonempty message");
            assert!(first.is_ascii_uppercase(), "{msg:?}");
            assert!(!msg.ends_with(['.', '!', '?']), "{msg:?}");
        }
    }

    #[test]
    fn display_includes_line() {
        use alloc::string::ToString;

        let err = Error::new(ErrorKind::UnmatchedRightParen, 12);
        assert_eq!(err.to_string(), "Unmatched right parenthesis at line 12");
    }
}
