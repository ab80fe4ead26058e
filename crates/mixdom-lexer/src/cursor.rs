use crate::SyntaxError;

/// Character returned by [`Cursor::peek`] and [`Cursor::peek_next`] once the
/// input is exhausted.
pub const EOF_CHAR: char = '\0';

/// A line/column/offset triple. Lines and columns are 1-based, the offset is a
/// byte index into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// Saved cursor state produced by [`Cursor::bookmark`].
///
/// Restoring a bookmark rewinds the cursor to exactly where it was, including
/// line and column counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    offset: usize,
    line: usize,
    column: usize,
}

impl Bookmark {
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }
}

/// Position-tracking cursor over an input buffer.
///
/// Offsets are byte indices into `source` and always sit on a char boundary.
/// Past the last character the cursor reports [`EOF_CHAR`]; use
/// [`Cursor::at_end`] to tell a real NUL in the input apart from the end.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the first character of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// The character under the cursor.
    pub fn peek(&self) -> char {
        self.rest().chars().next().unwrap_or(EOF_CHAR)
    }

    /// The character after the one under the cursor.
    pub fn peek_next(&self) -> char {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    /// Consume the current character and return the consumed source slice.
    ///
    /// `\r\n` is consumed as a single newline unit. Returns an empty slice at
    /// the end of input.
    pub fn advance(&mut self) -> &'a str {
        let start = self.offset;
        let Some(c) = self.rest().chars().next() else {
            return "";
        };
        self.offset += c.len_utf8();

        match c {
            '\n' => self.newline(),
            '\r' => {
                if self.rest().starts_with('\n') {
                    self.offset += 1;
                }
                self.newline();
            }
            _ => self.column += 1,
        }

        &self.source[start..self.offset]
    }

    /// Advance `n` times, stopping early at the end of input.
    pub fn skip(&mut self, n: usize) {
        for _ in 0..n {
            if self.at_end() {
                break;
            }
            self.advance();
        }
    }

    /// ASCII case-insensitive test for `literal` at the current offset.
    /// Does not consume anything.
    pub fn matches(&self, literal: &str) -> bool {
        self.rest()
            .get(..literal.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(literal))
    }

    pub fn bookmark(&self) -> Bookmark {
        Bookmark {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    pub fn restore(&mut self, bookmark: Bookmark) {
        self.offset = bookmark.offset;
        self.line = bookmark.line;
        self.column = bookmark.column;
    }

    pub fn at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Source text consumed since `start` (an earlier offset of this cursor).
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.offset]
    }

    /// The full source line containing the current offset, without its
    /// terminator.
    pub fn current_line_text(&self) -> &'a str {
        self.line_text_at(self.offset)
    }

    /// Build a [`SyntaxError`] located at the current position.
    pub fn error(&self, message: impl Into<String>) -> SyntaxError {
        self.error_at(self.bookmark(), message)
    }

    /// Build a [`SyntaxError`] located at an earlier bookmark.
    pub fn error_at(&self, bookmark: Bookmark, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            line: bookmark.line,
            column: bookmark.column,
            source_line: self.line_text_at(bookmark.offset).to_string(),
        }
    }

    fn line_text_at(&self, offset: usize) -> &'a str {
        let is_eol = |c: char| c == '\n' || c == '\r';
        let start = self.source[..offset].rfind(is_eol).map_or(0, |i| i + 1);
        let end = self.source[offset..]
            .find(is_eol)
            .map_or(self.source.len(), |i| offset + i);
        &self.source[start..end]
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn newline(&mut self) {
        self.line += 1;
        self.column = 1;
    }
}
