//! Reader configuration.

/// Capacity and nesting limits for the parsing pipeline.
///
/// Buffers start at their initial capacity and double on demand up to
/// the hard ceiling; reaching a ceiling is a recoverable error (for
/// example [`ErrorKind::TokenTooLong`]), never a panic.
///
/// # Examples
///
/// ```rust
/// use shastina::ReaderOptions;
///
/// let options = ReaderOptions {
///     max_string_length: 1024,
///     ..ReaderOptions::default()
/// };
/// ```
///
/// [`ErrorKind::TokenTooLong`]: crate::ErrorKind::TokenTooLong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Initial capacity of the token text buffer, in bytes.
    ///
    /// # Default
    ///
    /// `64`
    pub initial_token_capacity: usize,

    /// Maximum token length in bytes; exceeding it is
    /// [`ErrorKind::TokenTooLong`](crate::ErrorKind::TokenTooLong).
    ///
    /// Must be at least 2 (the `|;` final token).
    ///
    /// # Default
    ///
    /// `65_535`
    pub max_token_length: usize,

    /// Initial capacity of the string payload buffer, in bytes.
    ///
    /// # Default
    ///
    /// `256`
    pub initial_string_capacity: usize,

    /// Maximum string payload length in bytes; exceeding it is
    /// [`ErrorKind::StringTooLong`](crate::ErrorKind::StringTooLong).
    ///
    /// # Default
    ///
    /// `65_535`
    pub max_string_length: usize,

    /// Maximum number of simultaneously open arrays; exceeding it is
    /// [`ErrorKind::ArrayNestingTooDeep`](crate::ErrorKind::ArrayNestingTooDeep).
    ///
    /// # Default
    ///
    /// `1_024`
    pub max_array_depth: usize,

    /// Maximum number of elements in one array; exceeding it is
    /// [`ErrorKind::ArrayTooManyElements`](crate::ErrorKind::ArrayTooManyElements).
    ///
    /// # Default
    ///
    /// `u32::MAX`
    pub max_array_elements: u32,

    /// Maximum `(` depth within one scope; exceeding it is
    /// [`ErrorKind::GroupNestingTooDeep`](crate::ErrorKind::GroupNestingTooDeep).
    ///
    /// # Default
    ///
    /// `65_535`
    pub max_group_depth: u32,

    /// Maximum curly-brace depth inside a `{...}` string literal;
    /// exceeding it is
    /// [`ErrorKind::CurlyNestingTooDeep`](crate::ErrorKind::CurlyNestingTooDeep).
    ///
    /// # Default
    ///
    /// `65_535`
    pub max_curly_depth: u32,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            initial_token_capacity: 64,
            max_token_length: 65_535,
            initial_string_capacity: 256,
            max_string_length: 65_535,
            max_array_depth: 1_024,
            max_array_elements: u32::MAX,
            max_group_depth: 65_535,
            max_curly_depth: 65_535,
        }
    }
}

impl ReaderOptions {
    /// Panics if the configuration is unusable. Misconfiguration is a
    /// caller contract violation, not a recoverable parse error.
    pub(crate) fn validate(&self) {
        assert!(
            self.initial_token_capacity >= 1,
            "initial_token_capacity must be at least 1"
        );
        assert!(
            self.max_token_length >= 2,
            "max_token_length must admit the two-byte final token"
        );
        assert!(
            self.initial_string_capacity >= 1,
            "initial_string_capacity must be at least 1"
        );
        assert!(
            self.max_string_length >= 1,
            "max_string_length must be at least 1"
        );
        assert!(self.max_array_depth >= 1, "max_array_depth must be at least 1");
        assert!(self.max_group_depth >= 1, "max_group_depth must be at least 1");
        assert!(self.max_curly_depth >= 1, "max_curly_depth must be at least 1");
    }
}
