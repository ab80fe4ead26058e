//! Tree builder.
//!
//! Recursive descent over the lexer's entity stream. Each with-body element
//! gets its own recursive call that runs until the element's end tag (or the
//! end of input). Misnested end tags are repaired as follows, for end tag `T`
//! arriving while element `P` is open:
//!
//! 1. `T` is on top of the stray stack: an earlier recovery already closed
//!    this element, so the tag is dropped and the stack popped.
//! 2. `T` names `P`: normal close.
//! 3. `T` names an ancestor of `P`: `P` is closed implicitly, its name is
//!    pushed onto the stray stack, and the cursor is rewound so the ancestor
//!    sees `T` again.
//! 4. Otherwise `T` is dropped.
//!
//! Elements still open at the end of input are kept as they are. Since
//! nothing is closed implicitly, runs of unclosed tags nest; the builder
//! refuses to open more than [`MAX_DEPTH`] elements at once.

use crate::diagnostics::{DiagnosticSink, Warning, WarningKind};
use crate::node::{Document, Element, ElementKind, Node};
use mixdom_lexer::{
    is_raw_text_element, is_void_element, lexer, Bookmark, Cursor, EndTag, Entity, StartTag,
    SyntaxError,
};

/// Maximum number of with-body elements open at the same time.
pub const MAX_DEPTH: usize = 256;

/// What the current recursion level does after an end tag.
enum Flow {
    Continue,
    Return,
}

pub struct TreeBuilder<'a, 's, S: DiagnosticSink + ?Sized> {
    cursor: Cursor<'a>,
    /// Tag names of the elements being built, outermost first.
    open: Vec<String>,
    /// End tags already accounted for by a step-3 recovery.
    stray: Vec<String>,
    sink: &'s mut S,
}

impl<'a, 's, S: DiagnosticSink + ?Sized> TreeBuilder<'a, 's, S> {
    pub fn new(source: &'a str, sink: &'s mut S) -> Self {
        Self {
            cursor: Cursor::new(source),
            open: Vec::new(),
            stray: Vec::new(),
            sink,
        }
    }

    /// Build the whole document. The first syntax error aborts the build.
    pub fn build(mut self) -> Result<Document, SyntaxError> {
        let mut document = Document::default();
        self.build_children(&mut document.children)?;
        if !self.stray.is_empty() {
            log::debug!(target: "mixdom::parser", "unused stray end tags: {:?}", self.stray);
        }
        Ok(document)
    }

    fn build_children(&mut self, children: &mut Vec<Node>) -> Result<(), SyntaxError> {
        while !self.cursor.at_end() {
            let (mark, entity) = lexer::entity(&mut self.cursor)?;

            match entity {
                Entity::StartTag(tag) => self.start_tag(tag, mark, children)?,
                Entity::EndTag(tag) => match self.end_tag(&tag, mark) {
                    Flow::Continue => {}
                    Flow::Return => return Ok(()),
                },
                // whitespace-only tail of the input
                Entity::Text(text) if text.is_empty() => {}
                other => children.push(Node::leaf(other)),
            }
        }
        Ok(())
    }

    fn start_tag(
        &mut self,
        tag: StartTag,
        mark: Bookmark,
        children: &mut Vec<Node>,
    ) -> Result<(), SyntaxError> {
        if is_void_element(&tag.name) {
            children.push(Node::Element(Element::new(tag, ElementKind::Void)));
        } else if is_raw_text_element(&tag.name) {
            let body = lexer::cdata_until(&mut self.cursor, &format!("</{}>", tag.name))?;
            lexer::end_tag(&mut self.cursor)?;
            children.push(Node::Element(Element::with_raw_text(tag, body.to_string())));
        } else {
            if self.open.len() >= MAX_DEPTH {
                return Err(self.cursor.error_at(
                    mark,
                    format!("Maximum nesting depth of {MAX_DEPTH} exceeded at <{}>", tag.name),
                ));
            }
            let mut element = Element::new(tag, ElementKind::WithBody);
            self.open.push(element.tag_name().to_string());
            self.build_children(&mut element.children)?;
            self.open.pop();
            children.push(Node::Element(element));
        }
        Ok(())
    }

    fn end_tag(&mut self, tag: &EndTag, mark: Bookmark) -> Flow {
        if self.stray.last() == Some(&tag.name) {
            self.stray.pop();
            self.warn(
                WarningKind::MisplacedEndTagFixed,
                format!("Found misplaced end tag </{}> and fixed", tag.name),
                mark,
            );
            return Flow::Continue;
        }

        if let Some((parent, ancestors)) = self.open.split_last() {
            if *parent == tag.name {
                return Flow::Return;
            }

            if ancestors.contains(&tag.name) {
                let parent = parent.clone();
                self.warn(
                    WarningKind::MissingEndTag,
                    format!("End tag </{parent}> missing or misplaced, was added"),
                    mark,
                );
                self.stray.push(parent);
                self.cursor.restore(mark);
                return Flow::Return;
            }
        }

        self.warn(
            WarningKind::UnmatchedEndTag,
            format!("End tag </{}> does not match any parent, was ignored", tag.name),
            mark,
        );
        Flow::Continue
    }

    fn warn(&mut self, kind: WarningKind, message: String, mark: Bookmark) {
        self.sink
            .warning(Warning::new(kind, message, mark.position()));
    }
}
