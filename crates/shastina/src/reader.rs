//! Entity reader: the token-to-entity state machine.
//!
//! Consumes tokens from the [`Tokenizer`] and emits [`Entity`] values
//! in strict document order. Nesting is tracked with two counter
//! stacks:
//!
//! - `array_stack` holds one running element count per open array;
//! - `group_stack` holds one `(` depth counter per open array scope,
//!   plus a persistent bottom sentinel for the top level. It is never
//!   empty while the reader runs.
//!
//! Every array element is wrapped in an implicit group: the first token
//! of an element triggers a `BeginGroup`, and `,` / `]` close it again.
//! A single token can therefore legitimately produce several entities;
//! they are staged in a small bounded queue the client drains one at a
//! time. Overflowing that queue is a dispatch-logic defect and panics.

use alloc::collections::VecDeque;

use bstr::BString;

use crate::buffer::GrowableStack;
use crate::entity::{Entity, QuoteKind};
use crate::error::{Error, ErrorKind};
use crate::filter::InputFilter;
use crate::options::ReaderOptions;
use crate::source::{ByteSource, SliceSource};
use crate::token::{TokenKind, Tokenizer};

/// Upper bound on entities one token may expand into. An array close is
/// the worst real case at three (`BeginGroup` prefix, `EndGroup`,
/// `Array`); eight leaves headroom without hiding runaway dispatch.
const ENTITY_QUEUE_CAPACITY: usize = 8;

#[derive(Debug)]
struct EntityQueue {
    items: VecDeque<Entity>,
}

impl EntityQueue {
    fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(ENTITY_QUEUE_CAPACITY),
        }
    }

    fn push(&mut self, entity: Entity) {
        assert!(
            self.items.len() < ENTITY_QUEUE_CAPACITY,
            "entity queue overflow: one token expanded past the bound"
        );
        self.items.push_back(entity);
    }

    fn pop(&mut self) -> Option<Entity> {
        self.items.pop_front()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

#[derive(Debug)]
enum Status {
    Running,
    /// The `Eof` entity has been delivered; re-served without I/O.
    Done,
    Failed(Error),
}

/// Streaming pull reader producing Shastina entities.
///
/// Results are sticky: after [`Entity::Eof`] every further call returns
/// `Eof` again, and after an error the identical error, in both cases
/// without touching the input.
///
/// # Examples
///
/// ```
/// use shastina::{Entity, EntityReader};
///
/// let mut reader = EntityReader::from_slice(b"%newdoc;\n1 2 add\n|;");
/// let mut ops = 0;
/// loop {
///     match reader.read() {
///         Ok(Entity::Eof) => break,
///         Ok(Entity::Operation { .. }) => ops += 1,
///         Ok(_) => {}
///         Err(err) => panic!("parse failed: {err}"),
///     }
/// }
/// assert_eq!(ops, 1);
/// ```
#[derive(Debug)]
pub struct EntityReader<S> {
    tokenizer: Tokenizer<S>,
    status: Status,
    /// A metacommand is open.
    meta: bool,
    /// A `[` was seen and the first element token has not arrived yet.
    array_pending: bool,
    array_stack: GrowableStack,
    group_stack: GrowableStack,
    queue: EntityQueue,
    max_array_elements: u32,
    max_group_depth: u32,
}

impl<'a> EntityReader<SliceSource<'a>> {
    /// Builds a reader over an in-memory byte slice.
    #[must_use]
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(SliceSource::new(data))
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> EntityReader<crate::source::ReadSource<R>> {
    /// Builds a reader over a [`std::io::Read`].
    #[must_use]
    pub fn from_reader(reader: R) -> Self {
        Self::new(crate::source::ReadSource::new(reader))
    }
}

impl<S: ByteSource> EntityReader<S> {
    /// Builds a reader with default options.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_options(source, ReaderOptions::default())
    }

    /// Builds a reader with explicit options.
    ///
    /// # Panics
    ///
    /// Panics if `options` is unusable (see [`ReaderOptions`]).
    #[must_use]
    pub fn with_options(source: S, options: ReaderOptions) -> Self {
        let mut group_stack = GrowableStack::new(4, options.max_array_depth.saturating_add(1));
        // Bottom sentinel: `(` depth of the top-level scope.
        group_stack
            .push(0)
            .expect("group stack admits the sentinel");
        Self {
            tokenizer: Tokenizer::new(source, options),
            status: Status::Running,
            meta: false,
            array_pending: false,
            array_stack: GrowableStack::new(4, options.max_array_depth),
            group_stack,
            queue: EntityQueue::new(),
            max_array_elements: options.max_array_elements,
            max_group_depth: options.max_group_depth,
        }
    }

    /// Reads the next entity in document order.
    pub fn read(&mut self) -> Result<Entity, Error> {
        loop {
            if let Some(entity) = self.queue.pop() {
                return Ok(entity);
            }
            match &self.status {
                Status::Running => {}
                Status::Done => return Ok(Entity::Eof),
                Status::Failed(err) => return Err(err.clone()),
            }
            if let Err(err) = self.step() {
                // Entities staged by the failing token never surface.
                self.queue.clear();
                self.status = Status::Failed(err.clone());
                return Err(err);
            }
        }
    }

    /// Iterator adapter yielding entities through `Eof` (inclusive) or
    /// one error, then ending.
    pub fn entities(&mut self) -> Entities<'_, S> {
        Entities {
            reader: self,
            done: false,
        }
    }

    /// The 1-based input line, saturating at `u32::MAX`.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.tokenizer.line()
    }

    /// Whether the input began with a UTF-8 byte order mark.
    ///
    /// Meaningful only once at least one entity has been read.
    #[must_use]
    pub const fn had_bom(&self) -> bool {
        self.tokenizer.had_bom()
    }

    /// Bytes the underlying source has handed out so far.
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.tokenizer.bytes_consumed()
    }

    /// Access to the input filter, for consuming embedded data after an
    /// [`Entity::Embedded`] (see [`InputFilter::source_mut`]).
    pub const fn input_mut(&mut self) -> &mut InputFilter<S> {
        self.tokenizer.filter_mut()
    }

    /// Pulls one token and dispatches it into the entity queue.
    fn step(&mut self) -> Result<(), Error> {
        debug_assert_eq!(
            self.group_stack.len(),
            self.array_stack.len() + 1,
            "nesting stacks out of lock-step"
        );
        let (kind, text, line) = {
            let token = self.tokenizer.read_token()?;
            (token.kind, token.text.to_vec(), token.line)
        };

        // The final token closes nothing implicitly; it is checked
        // against open state as-is.
        if kind == TokenKind::Final {
            return self.finish(line);
        }

        // Array-open prefixing: outside a metacommand, the first token
        // of a new element opens its implicit group. A literal `]`
        // instead makes the array empty.
        if !self.meta
            && self.array_pending
            && !(kind == TokenKind::Simple && text.as_slice() == b"]")
        {
            self.open_element(line)?;
        }

        match kind {
            TokenKind::Simple => self.dispatch_simple(&text, line),
            TokenKind::StringOpen(quote) => {
                let payload = BString::from(match quote {
                    QuoteKind::Quoted => self.tokenizer.read_quoted()?,
                    QuoteKind::Curly => self.tokenizer.read_curlied()?,
                });
                let prefix = BString::from(text);
                if self.meta {
                    self.queue.push(Entity::MetaString {
                        prefix,
                        kind: quote,
                        payload,
                    });
                } else {
                    self.queue.push(Entity::String {
                        prefix,
                        kind: quote,
                        payload,
                    });
                }
                Ok(())
            }
            TokenKind::EmbedOpen => {
                if self.meta {
                    return Err(Error::new(ErrorKind::EmbedInsideMetacommand, line));
                }
                self.queue.push(Entity::Embedded {
                    prefix: BString::from(text),
                });
                Ok(())
            }
            TokenKind::Final => unreachable!("handled above"),
        }
    }

    fn dispatch_simple(&mut self, text: &[u8], line: u32) -> Result<(), Error> {
        if self.meta {
            return match text {
                b"%" => Err(Error::new(ErrorKind::MetacommandNesting, line)),
                b";" => {
                    self.meta = false;
                    self.queue.push(Entity::EndMeta);
                    Ok(())
                }
                _ => {
                    self.queue.push(Entity::MetaToken {
                        text: BString::from(text),
                    });
                    Ok(())
                }
            };
        }
        match text {
            b"%" => {
                self.meta = true;
                self.queue.push(Entity::BeginMeta);
                Ok(())
            }
            b";" => Err(Error::new(ErrorKind::SemicolonOutsideMetacommand, line)),
            b"(" => self.open_group(line),
            b")" => self.close_group(line),
            b"[" => {
                self.array_pending = true;
                Ok(())
            }
            b"]" => self.close_array(line),
            b"," => self.next_element(line),
            _ => {
                let entity = match text[0] {
                    b'+' | b'-' | b'0'..=b'9' => Entity::Numeric {
                        text: BString::from(text),
                    },
                    b'?' => Entity::Variable {
                        name: BString::from(&text[1..]),
                    },
                    b'@' => Entity::Constant {
                        name: BString::from(&text[1..]),
                    },
                    b':' => Entity::Assign {
                        name: BString::from(&text[1..]),
                    },
                    b'=' => Entity::Get {
                        name: BString::from(&text[1..]),
                    },
                    _ => Entity::Operation {
                        name: BString::from(text),
                    },
                };
                self.queue.push(entity);
                Ok(())
            }
        }
    }

    /// First token of an array element: open its implicit group scope.
    fn open_element(&mut self, line: u32) -> Result<(), Error> {
        if self.array_stack.push(1).is_err() {
            return Err(Error::new(ErrorKind::ArrayNestingTooDeep, line));
        }
        self.group_stack
            .push(0)
            .map_err(|_| Error::new(ErrorKind::ArrayNestingTooDeep, line))?;
        self.array_pending = false;
        self.queue.push(Entity::BeginGroup);
        Ok(())
    }

    fn open_group(&mut self, line: u32) -> Result<(), Error> {
        let depth = self.group_stack.top_mut();
        if *depth >= self.max_group_depth {
            return Err(Error::new(ErrorKind::GroupNestingTooDeep, line));
        }
        *depth += 1;
        self.queue.push(Entity::BeginGroup);
        Ok(())
    }

    fn close_group(&mut self, line: u32) -> Result<(), Error> {
        let depth = self.group_stack.top_mut();
        if *depth == 0 {
            return Err(Error::new(ErrorKind::UnmatchedRightParen, line));
        }
        *depth -= 1;
        self.queue.push(Entity::EndGroup);
        Ok(())
    }

    fn close_array(&mut self, line: u32) -> Result<(), Error> {
        if self.array_pending {
            // `[` directly followed by `]`.
            self.array_pending = false;
            self.queue.push(Entity::Array { count: 0 });
            return Ok(());
        }
        if self.array_stack.is_empty() {
            return Err(Error::new(ErrorKind::UnmatchedRightBracket, line));
        }
        if self.group_stack.top() != 0 {
            return Err(Error::new(ErrorKind::OpenGroupAtArrayBoundary, line));
        }
        self.queue.push(Entity::EndGroup);
        let count = self.array_stack.pop();
        self.group_stack.pop();
        self.queue.push(Entity::Array { count });
        Ok(())
    }

    /// `,`: close the previous element's implicit group and open the
    /// next one.
    fn next_element(&mut self, line: u32) -> Result<(), Error> {
        if self.array_stack.is_empty() {
            return Err(Error::new(ErrorKind::CommaOutsideArray, line));
        }
        if self.group_stack.top() != 0 {
            return Err(Error::new(ErrorKind::OpenGroupAtArrayBoundary, line));
        }
        let count = self.array_stack.top_mut();
        *count = match count.checked_add(1) {
            Some(next) if next <= self.max_array_elements => next,
            _ => return Err(Error::new(ErrorKind::ArrayTooManyElements, line)),
        };
        self.queue.push(Entity::EndGroup);
        self.queue.push(Entity::BeginGroup);
        Ok(())
    }

    /// The `|;` final token: everything must be closed.
    fn finish(&mut self, line: u32) -> Result<(), Error> {
        if self.meta {
            return Err(Error::new(ErrorKind::UnclosedMetacommandAtEof, line));
        }
        if self.array_pending || !self.array_stack.is_empty() {
            return Err(Error::new(ErrorKind::UnclosedArrayAtEof, line));
        }
        if self.group_stack.top() != 0 {
            return Err(Error::new(ErrorKind::UnclosedGroupAtEof, line));
        }
        self.queue.push(Entity::Eof);
        self.status = Status::Done;
        Ok(())
    }
}

/// Iterator over a reader's entities; see [`EntityReader::entities`].
#[derive(Debug)]
pub struct Entities<'a, S> {
    reader: &'a mut EntityReader<S>,
    done: bool,
}

impl<S: ByteSource> Iterator for Entities<'_, S> {
    type Item = Result<Entity, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read() {
            Ok(Entity::Eof) => {
                self.done = true;
                Some(Ok(Entity::Eof))
            }
            Ok(entity) => Some(Ok(entity)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
