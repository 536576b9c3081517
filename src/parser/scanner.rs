//! Character scanner with lexeme marking and nested backtracking
//!
//! The [`Scanner`] walks a borrowed source string one character at a time.
//! Two cursors are tracked: the current position and the mark, which records
//! where the lexeme being built started. [`Scanner::save`] pushes both onto a
//! stack and [`Scanner::restore`] pops them back, so speculative scans can nest
//! to any depth.

use super::lexer::LexError;

/// A contiguous region of the source, as a byte offset and a byte length.
///
/// Spans never own text; call [`Span::text`] with the originating source to
/// get the lexeme back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Byte offset one past the last byte of the span.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The slice of `source` this span covers.
    ///
    /// Returns an empty string if the span does not fit inside `source`
    /// (which only happens when a span is paired with the wrong source).
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.offset..self.end()).unwrap_or("")
    }
}

/// Human-facing position (1-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Resolve a byte offset into a line and column.
    ///
    /// Columns count characters. Offsets past the end of `source` resolve to
    /// the position just after the last character.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;

        for (idx, ch) in source.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        Self { line, column }
    }
}

/// A snapshot of the scanner cursors, as pushed by [`Scanner::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScanState {
    position: usize,
    mark: usize,
}

/// Cursor over an immutable source string.
///
/// Invariant: `mark <= position <= source.len()`.
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    source: &'src str,
    position: usize,
    mark: usize,
    saved: Vec<ScanState>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
            mark: 0,
            saved: Vec::new(),
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn mark_position(&self) -> usize {
        self.mark
    }

    /// Number of outstanding [`save`](Self::save) calls.
    pub fn saved_depth(&self) -> usize {
        self.saved.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Character at the current position, without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    /// Consume and return the character at the current position.
    ///
    /// At end of input this returns `None` and the position is unchanged.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Begin a new lexeme at the current position.
    pub fn mark(&mut self) {
        self.mark = self.position;
    }

    /// Close the lexeme started by the last [`mark`](Self::mark).
    ///
    /// Returns `None` when nothing has been consumed since the mark; callers
    /// treat that as an internal error.
    pub fn end_mark(&self) -> Option<Span> {
        if self.position == self.mark {
            return None;
        }
        Some(Span::new(self.mark, self.position - self.mark))
    }

    /// Push the current cursors onto the saved-state stack.
    pub fn save(&mut self) {
        self.saved.push(ScanState {
            position: self.position,
            mark: self.mark,
        });
    }

    /// Pop the most recent saved state and rewind to it.
    pub fn restore(&mut self) -> Result<(), LexError> {
        let state = self.saved.pop().ok_or(LexError::UnbalancedRestore)?;
        self.position = state.position;
        self.mark = state.mark;
        Ok(())
    }
}
