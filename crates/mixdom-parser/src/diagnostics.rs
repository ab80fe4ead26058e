//! Recoverable diagnostics raised while building the tree.

use mixdom_lexer::Position;
use std::fmt;

/// Which recovery step produced a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// An end tag that an earlier recovery had already closed was discarded.
    MisplacedEndTagFixed,
    /// An element was closed implicitly because an ancestor's end tag arrived.
    MissingEndTag,
    /// An end tag matched no open element and was dropped.
    UnmatchedEndTag,
}

/// A recovered condition. Line and column point at the start of the end tag
/// that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Warning {
    pub(crate) fn new(kind: WarningKind, message: String, at: Position) -> Self {
        Self {
            kind,
            message,
            line: at.line,
            column: at.column,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Warning at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

/// Receives warnings as the tree builder recovers from malformed nesting.
pub trait DiagnosticSink {
    fn warning(&mut self, warning: Warning);
}

impl DiagnosticSink for Vec<Warning> {
    fn warning(&mut self, warning: Warning) {
        self.push(warning);
    }
}

/// Forwards warnings to the `log` facade at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warning(&mut self, warning: Warning) {
        log::warn!(target: "mixdom::parser", "{warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_warning_display() {
        let w = Warning::new(
            WarningKind::UnmatchedEndTag,
            "End tag </q> does not match any parent, was ignored".into(),
            Position {
                line: 4,
                column: 2,
                offset: 40,
            },
        );
        assert_eq!(
            w.to_string(),
            "Warning at line 4, column 2: End tag </q> does not match any parent, was ignored"
        );
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<Warning> = Vec::new();
        let at = Position {
            line: 1,
            column: 1,
            offset: 0,
        };
        sink.warning(Warning::new(WarningKind::MissingEndTag, "a".into(), at));
        sink.warning(Warning::new(WarningKind::MisplacedEndTagFixed, "b".into(), at));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].kind, WarningKind::MisplacedEndTagFixed);
    }
}
