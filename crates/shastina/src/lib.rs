//! Streaming pull parser for the Shastina interchange language.
//!
//! Shastina is a small, stack-oriented textual format (`%` … `;`
//! metacommands, `(` `)` groups, `[` `]` `,` arrays, quoted and curly
//! strings, bareword operations) meant to be consumed by a downstream
//! interpreter. This crate is the syntactic backbone only: it turns a
//! raw byte stream into a linearized sequence of [`Entity`] values and
//! performs no evaluation.
//!
//! The pipeline is pull-based and single pass: a [`ByteSource`] feeds
//! an [`InputFilter`] (BOM stripping, newline canonicalization, final
//! line-break guarantee, one character of pushback), a [`Tokenizer`]
//! groups the filtered characters into tokens, and an [`EntityReader`]
//! runs the nesting state machine and hands entities to the client one
//! at a time. EOF and errors are sticky at every layer.
//!
//! # Examples
//!
//! ```
//! use shastina::{Entity, EntityReader};
//!
//! let source = b"%newdoc;\n[1, 2] count\n|;";
//! let mut reader = EntityReader::from_slice(source);
//! loop {
//!     match reader.read() {
//!         Ok(Entity::Eof) => break,
//!         Ok(entity) => println!("{entity:?}"),
//!         Err(err) => {
//!             eprintln!("{err}");
//!             break;
//!         }
//!     }
//! }
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod entity;
mod error;
mod filter;
mod options;
mod reader;
mod source;
mod strings;
mod token;

#[cfg(test)]
mod tests;

pub use entity::{Entity, QuoteKind};
pub use error::{Error, ErrorKind, error_message};
pub use filter::InputFilter;
pub use options::ReaderOptions;
pub use reader::{Entities, EntityReader};
#[cfg(feature = "std")]
pub use source::ReadSource;
pub use source::{ByteSource, SliceSource, SourceError};
pub use token::{Token, TokenKind, Tokenizer};
