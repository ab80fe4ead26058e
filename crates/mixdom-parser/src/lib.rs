//! mixdom Parser
//!
//! Builds a document tree from HTML mixed with embedded PHP/Ruby code.
//! Malformed nesting is repaired and reported through a [`DiagnosticSink`];
//! grammar violations abort the parse with a [`ParseError`].
//!
//! ```
//! use mixdom_parser::{parse_with, ParentNode, Warning};
//!
//! let mut warnings: Vec<Warning> = Vec::new();
//! let doc = parse_with("<div><span>a</div>", &mut warnings).unwrap();
//! assert_eq!(doc.to_text(), "<div><span>a</span></div>");
//! assert_eq!(warnings.len(), 1);
//! assert!(doc.find("div").is_some());
//! ```

pub mod builder;
pub mod diagnostics;
pub mod node;

pub use builder::{TreeBuilder, MAX_DEPTH};
pub use diagnostics::{DiagnosticSink, LogSink, Warning, WarningKind};
pub use mixdom_lexer::SyntaxError;
pub use node::{Document, Element, ElementKind, Node, ParentNode};

use std::io;
use std::path::{Path, PathBuf};

/// Parser error: a fatal syntax error or an unreadable file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parse `source`, sending warnings to the `log` facade.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    parse_with(source, &mut LogSink)
}

/// Parse `source`, sending warnings to `sink`.
///
/// The first syntax error discards the partial tree.
pub fn parse_with<S>(source: &str, sink: &mut S) -> Result<Document, ParseError>
where
    S: DiagnosticSink + ?Sized,
{
    TreeBuilder::new(source, sink).build().map_err(|err| {
        log::debug!(target: "mixdom::parser", "parse aborted: {err}");
        ParseError::Syntax(err)
    })
}

/// Parse a file, sending warnings to the `log` facade.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Option<Document>, ParseError> {
    parse_file_with(path, &mut LogSink)
}

/// Parse a file, sending warnings to `sink`. Returns `Ok(None)` if the file
/// does not exist.
pub fn parse_file_with<S>(
    path: impl AsRef<Path>,
    sink: &mut S,
) -> Result<Option<Document>, ParseError>
where
    S: DiagnosticSink + ?Sized,
{
    let path = path.as_ref();
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ParseError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    parse_with(&source, sink).map(Some)
}
