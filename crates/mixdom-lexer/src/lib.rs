//! mixdom Lexer
//!
//! Scans HTML mixed with embedded PHP (`<?php ... ?>`) and Ruby (`<%= ... %>`)
//! fragments into a stream of entities. Each entity keeps enough of its source
//! form to be written back out again.
//!
//! The scanner is built from small productions (one per grammar rule) that all
//! operate on a shared [`Cursor`]. The cursor tracks line and column for error
//! reporting and supports a single bookmark for backtracking.
//!
//! # Example
//!
//! ```
//! use mixdom_lexer::{lexer, Cursor, Entity};
//!
//! let mut cursor = Cursor::new("<p class=\"intro\">");
//! let (_, entity) = lexer::entity(&mut cursor).unwrap();
//! assert!(matches!(entity, Entity::StartTag(ref tag) if tag.name == "p"));
//! assert!(cursor.at_end());
//! ```

pub mod cursor;
pub mod entity;
pub mod lexer;

pub use cursor::{Bookmark, Cursor, Position};
pub use entity::{
    is_raw_text_element, is_void_element, AttrValue, CodeKind, Doctype, DoctypeToken,
    EmbeddedCode, EndTag, Entity, StartTag, TagAttribute,
};

/// Fatal lexer error with position information.
///
/// `source_line` holds the text of the line the cursor was on when the error
/// was raised, without its line terminator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Syntax error at line {line}, column {column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub source_line: String,
}

impl SyntaxError {
    /// Render the offending line with a `^` marker under the error column.
    ///
    /// Tabs before the column are kept so the marker lines up in a terminal.
    pub fn caret(&self) -> String {
        let pad: String = self
            .source_line
            .chars()
            .take(self.column.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        format!("{}\n{pad}^ {}", self.source_line, self.message)
    }
}
