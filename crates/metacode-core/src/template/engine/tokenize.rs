//! Tokenization for template engine
//!
//! Provides O(n) tokenization using a state machine.

/// Token classification by leading syntax
///
/// Only the leading syntax is inspected here; the parser validates the
/// rest of the directive.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// {{name}} or {{name.field}}
    Placeholder { expr: String },

    /// {{#name}}
    Count { name: String },

    /// {{#for ...}}
    BlockStart { keyword: String, args: String },

    /// {{/for}}
    BlockEnd { keyword: String },
}

/// A single {{...}} token with position and classification
///
/// Represents a tokenized directive in the template with metadata
/// for parsing and error reporting.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    /// Token classification
    pub kind: TokenKind,
    /// Directive text between the markers, without trim markers
    pub content: String,
    /// Absolute byte position of `{{` in template
    pub start: usize,
    /// Total length in bytes including {{ and }}
    pub length: usize,
    /// Number of backslashes before `{{`
    /// Odd count = escaped (literal), even = real (processed)
    pub backslash_count: usize,
    /// `{{~`: strip blanks before the directive
    pub trim_left: bool,
    /// `~}}`: strip blanks and one line break after the directive
    pub trim_right: bool,
    /// Line number of the opening `{{` (1-based)
    pub line: usize,
    /// Column of the opening `{{` (1-based, in characters)
    pub column: usize,
}

impl Token {
    /// Check if this token is escaped (odd backslash count)
    pub fn is_escaped(&self) -> bool {
        self.backslash_count % 2 == 1
    }

    /// Byte position one past the closing `}}`
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// A `{{` left open at end of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unclosed {
    /// Absolute byte position of `{{`
    pub start: usize,
    pub line: usize,
    pub column: usize,
    /// Number of backslashes before `{{`
    pub backslash_count: usize,
}

impl Unclosed {
    /// An escaped opener is plain text and needs no closer
    pub fn is_escaped(&self) -> bool {
        self.backslash_count % 2 == 1
    }
}

/// Tokenization state machine (explicit for testability)
///
/// This state machine ensures O(n) tokenization by processing each byte exactly once
/// in a forward-only manner.
///
/// # State Transitions
///
/// ```text
/// Normal ──{───> SeenLBrace ──{───> InToken ──}───> SeenRBrace ──}───> [Yield Token] → Normal
///   │               │                  │                  │
///   │ (not {)       │ (not {)          │ (not })          │ (not })
///   └──────────────>└─────────────────>└─────────────────>└──────────> Normal
/// ```
///
/// A `{{` without `}}` leaves the machine in `InToken` or `SeenRBrace` at
/// end of input, which [`TokenStream::unterminated`] reports.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScanState {
    /// Normal text scanning
    ///
    /// Forward-only: backslash_count accumulates as we scan forward.
    Normal {
        /// Number of consecutive backslashes seen before current position
        backslash_count: usize,
    },

    /// Seen first `{`, checking for second `{`
    SeenLBrace {
        /// Position of the first `{` character
        pos: usize,
        /// Backslash count before the `{` (for escape detection)
        backslash_count: usize,
    },

    /// Inside `{{...}}`, scanning until `}}`
    InToken {
        /// Byte position of the opening `{{`
        start: usize,
        /// Byte position where token content starts (after `{{`)
        content_start: usize,
        /// Backslash count before the opening `{{` (for escape detection)
        backslash_count: usize,
    },

    /// Seen first `}` inside token, checking for second `}`
    SeenRBrace {
        /// Byte position of the opening `{{`
        start: usize,
        /// Byte position where token content starts (after `{{`)
        content_start: usize,
        /// Position of the first `}` character
        rbrace_pos: usize,
        /// Backslash count before the opening `{{` (for escape detection)
        backslash_count: usize,
    },
}

/// Iterator over tokens in a template string
///
/// # Performance
///
/// - **O(n) guarantee**: Each byte processed at most twice
/// - **Forward-only**: Position never moves backward
pub(crate) struct TokenStream<'a> {
    /// Zero-copy byte slice of template text
    bytes: &'a [u8],
    /// Current byte position
    pos: usize,
    /// State machine state
    state: ScanState,
    /// Current line number (for error messages)
    line: usize,
    /// Byte offset where the current line starts
    line_start: usize,
    /// Line and column of the `{{` currently being scanned
    open_at: (usize, usize),
    /// Step count for O(n) protection
    step_count: usize,
}

impl<'a> TokenStream<'a> {
    /// Create a new TokenStream from template text
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            state: ScanState::Normal { backslash_count: 0 },
            line: 1,
            line_start: 0,
            open_at: (1, 1),
            step_count: 0,
        }
    }

    /// The `{{` that was never closed, once the stream is exhausted
    pub fn unterminated(&self) -> Option<Unclosed> {
        match self.state {
            ScanState::InToken {
                start,
                backslash_count,
                ..
            }
            | ScanState::SeenRBrace {
                start,
                backslash_count,
                ..
            } => Some(Unclosed {
                start,
                line: self.open_at.0,
                column: self.open_at.1,
                backslash_count,
            }),
            _ => None,
        }
    }

    /// Split trim markers off the raw token content
    ///
    /// Returns `(inner, trim_left, trim_right)`.
    fn split_trim(content: &str) -> (&str, bool, bool) {
        let (content, trim_left) = match content.strip_prefix('~') {
            Some(rest) => (rest, true),
            None => (content, false),
        };
        let (content, trim_right) = match content.strip_suffix('~') {
            Some(rest) => (rest, true),
            None => (content, false),
        };
        (content, trim_left, trim_right)
    }

    /// Classify token content into TokenKind
    ///
    /// - `#for ...` → BlockStart
    /// - `/for` → BlockEnd
    /// - `#name` → Count
    /// - `name` or `name.field` → Placeholder
    fn classify_content(content: &str) -> TokenKind {
        let trimmed = content.trim();

        if let Some(rest) = trimmed.strip_prefix("#for") {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return TokenKind::BlockStart {
                    keyword: "for".to_string(),
                    args: rest.trim().to_string(),
                };
            }
        }

        if let Some(rest) = trimmed.strip_prefix('/') {
            TokenKind::BlockEnd {
                keyword: rest.trim().to_string(),
            }
        } else if let Some(rest) = trimmed.strip_prefix('#') {
            TokenKind::Count {
                name: rest.trim().to_string(),
            }
        } else {
            TokenKind::Placeholder {
                expr: trimmed.to_string(),
            }
        }
    }

    /// Column (1-based, in characters) of a byte position on the current line
    fn column_of(&self, pos: usize) -> usize {
        let prefix = &self.bytes[self.line_start..pos];
        std::str::from_utf8(prefix)
            .map(|s| s.chars().count())
            .unwrap_or(prefix.len())
            + 1
    }

    /// Advance past a newline byte
    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.pos + 1;
    }

    /// Check if we should continue iteration (guards for runaway scans and EOF)
    #[inline]
    fn should_continue(&mut self, max_steps: usize) -> bool {
        self.step_count += 1;
        self.step_count <= max_steps && self.pos < self.bytes.len()
    }

    /// Record step for O(n) performance verification in tests
    #[cfg(test)]
    #[inline]
    fn record_test_step() {
        test_counter::inc();
    }

    /// Process Normal state: scan for backslashes and opening braces
    fn process_normal_state(&mut self, byte: u8, backslash_count: usize) {
        if byte == b'\\' {
            self.state = ScanState::Normal {
                backslash_count: backslash_count + 1,
            };
        } else if byte == b'{' {
            self.state = ScanState::SeenLBrace {
                pos: self.pos,
                backslash_count,
            };
        } else {
            if byte == b'\n' {
                self.newline();
            }
            self.state = ScanState::Normal { backslash_count: 0 };
        }
        self.pos += 1;
    }

    /// Process SeenLBrace state: check for second brace to start token
    ///
    /// Returns true if position was advanced, false if byte should be reprocessed
    fn process_seen_lbrace(&mut self, byte: u8, lbrace_pos: usize, backslash_count: usize) -> bool {
        if byte == b'{' {
            self.open_at = (self.line, self.column_of(lbrace_pos));
            self.state = ScanState::InToken {
                start: lbrace_pos,
                content_start: self.pos + 1,
                backslash_count,
            };
            self.pos += 1;
            true
        } else {
            // Just a single {, not a token
            self.state = ScanState::Normal { backslash_count: 0 };
            false
        }
    }

    /// Process InToken state: scan for closing braces
    fn process_in_token(
        &mut self,
        byte: u8,
        start: usize,
        content_start: usize,
        backslash_count: usize,
    ) {
        if byte == b'}' {
            self.state = ScanState::SeenRBrace {
                start,
                content_start,
                rbrace_pos: self.pos,
                backslash_count,
            };
        } else if byte == b'\n' {
            self.newline();
        }
        self.pos += 1;
    }

    /// Process SeenRBrace state: check for second brace to complete token
    ///
    /// Returns (Option<Token>, advanced)
    fn process_seen_rbrace(
        &mut self,
        byte: u8,
        start: usize,
        content_start: usize,
        rbrace_pos: usize,
        backslash_count: usize,
    ) -> (Option<Token>, bool) {
        if byte == b'}' {
            let raw = std::str::from_utf8(&self.bytes[content_start..rbrace_pos]).unwrap_or("");
            let (inner, trim_left, trim_right) = Self::split_trim(raw);

            let token = Token {
                kind: Self::classify_content(inner),
                content: inner.trim().to_string(),
                start,
                length: self.pos + 1 - start,
                backslash_count,
                trim_left,
                trim_right,
                line: self.open_at.0,
                column: self.open_at.1,
            };

            self.state = ScanState::Normal { backslash_count: 0 };
            self.pos += 1;

            (Some(token), true)
        } else {
            // Just a single } inside content, continue scanning
            self.state = ScanState::InToken {
                start,
                content_start,
                backslash_count,
            };
            (None, false)
        }
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        const MAX_STEPS_MULTIPLIER: usize = 3;
        let max_steps = self.bytes.len().saturating_mul(MAX_STEPS_MULTIPLIER);

        loop {
            if !self.should_continue(max_steps) {
                return None;
            }

            let byte = self.bytes[self.pos];
            #[cfg(test)]
            Self::record_test_step();

            match &self.state {
                ScanState::Normal { backslash_count } => {
                    self.process_normal_state(byte, *backslash_count)
                }
                ScanState::SeenLBrace {
                    pos,
                    backslash_count,
                } => {
                    if !self.process_seen_lbrace(byte, *pos, *backslash_count) {
                        continue;
                    }
                }
                ScanState::InToken {
                    start,
                    content_start,
                    backslash_count,
                } => self.process_in_token(byte, *start, *content_start, *backslash_count),
                ScanState::SeenRBrace {
                    start,
                    content_start,
                    rbrace_pos,
                    backslash_count,
                } => {
                    let (token, advanced) = self.process_seen_rbrace(
                        byte,
                        *start,
                        *content_start,
                        *rbrace_pos,
                        *backslash_count,
                    );
                    if let Some(token) = token {
                        return Some(token);
                    }
                    if !advanced {
                        continue;
                    }
                }
            }
        }
    }
}

/// Test-only step counter for O(n) performance verification
///
/// Uses thread-local storage to avoid interference between parallel tests.
#[cfg(test)]
pub(crate) mod test_counter {
    use std::cell::Cell;

    thread_local! {
        static TEST_STEP_COUNTER: Cell<usize> = const { Cell::new(0) };
    }

    pub(crate) fn reset() {
        TEST_STEP_COUNTER.with(|c| c.set(0));
    }

    pub(crate) fn get() -> usize {
        TEST_STEP_COUNTER.with(|c| c.get())
    }

    pub(crate) fn inc() {
        TEST_STEP_COUNTER.with(|c| c.set(c.get() + 1));
    }
}
