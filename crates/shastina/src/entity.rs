//! Entities emitted by the streaming parser.
//!
//! An [`Entity`] is one semantic unit of parsed Shastina syntax. All
//! text carried by entities is an owned, UTF-8-opaque [`BString`]; the
//! parser imposes no character-set interpretation on string payloads.

use bstr::BString;

/// Which delimiter pair a string literal used.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    /// A `"` ... `"` literal.
    Quoted,
    /// A `{` ... `}` literal with brace nesting.
    Curly,
}

/// One parsed entity, in document order.
///
/// # Examples
///
/// ```
/// use shastina::{Entity, EntityReader};
///
/// let mut reader = EntityReader::from_slice(b"[]\n|;");
/// assert_eq!(reader.read(), Ok(Entity::Array { count: 0 }));
/// assert_eq!(reader.read(), Ok(Entity::Eof));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// The `|;` final token: end of the well-formed source.
    Eof,
    /// A string literal outside any metacommand.
    String {
        /// Token text preceding the opening delimiter (may be empty).
        prefix: BString,
        /// The delimiter pair the literal used.
        kind: QuoteKind,
        /// Raw payload bytes, escapes untouched, closer excluded.
        payload: BString,
    },
    /// An embedded-data opening (backtick). The payload itself is not
    /// parsed; consuming it is the client's affair.
    Embedded {
        /// Token text preceding the backtick (may be empty).
        prefix: BString,
    },
    /// A `%` opening a metacommand.
    BeginMeta,
    /// A `;` closing a metacommand.
    EndMeta,
    /// A bare token inside a metacommand.
    MetaToken {
        /// The token text.
        text: BString,
    },
    /// A string literal inside a metacommand.
    MetaString {
        /// Token text preceding the opening delimiter (may be empty).
        prefix: BString,
        /// The delimiter pair the literal used.
        kind: QuoteKind,
        /// Raw payload bytes, escapes untouched, closer excluded.
        payload: BString,
    },
    /// A token starting with `+`, `-` or a digit.
    Numeric {
        /// The full token text, sign included.
        text: BString,
    },
    /// A `?name` variable declaration.
    Variable {
        /// The text after `?`.
        name: BString,
    },
    /// An `@name` constant declaration.
    Constant {
        /// The text after `@`.
        name: BString,
    },
    /// A `:name` assignment.
    Assign {
        /// The text after `:`.
        name: BString,
    },
    /// An `=name` read.
    Get {
        /// The text after `=`.
        name: BString,
    },
    /// A `(` group opening, explicit or implicit around an array
    /// element.
    BeginGroup,
    /// The matching group close.
    EndGroup,
    /// A completed array and its element count.
    Array {
        /// Number of elements the array held.
        count: u32,
    },
    /// Any other bareword: an operation for the downstream interpreter.
    Operation {
        /// The token text.
        name: BString,
    },
}

impl Entity {
    /// The stable non-negative code for this entity's kind.
    ///
    /// Together with [`ErrorKind::code`](crate::ErrorKind::code) this
    /// reproduces the flat integer status space of the original C-style
    /// interface: entity kinds are `>= 0`, errors are `< 0`.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Eof => 0,
            Self::String { .. } => 1,
            Self::Embedded { .. } => 2,
            Self::BeginMeta => 3,
            Self::EndMeta => 4,
            Self::MetaToken { .. } => 5,
            Self::MetaString { .. } => 6,
            Self::Numeric { .. } => 7,
            Self::Variable { .. } => 8,
            Self::Constant { .. } => 9,
            Self::Assign { .. } => 10,
            Self::Get { .. } => 11,
            Self::BeginGroup => 12,
            Self::EndGroup => 13,
            Self::Array { .. } => 14,
            Self::Operation { .. } => 15,
        }
    }

    /// Returns `true` for the terminal [`Eof`](Entity::Eof) entity.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}
