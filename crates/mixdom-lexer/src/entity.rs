//! Entity model: one value per lexical production.
//!
//! Every entity renders back to its source form through `Display`.

use std::fmt;

/// HTML void elements (no body, no closing tag).
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Elements whose body is captured verbatim instead of being parsed as markup.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Check if a (lower-cased) tag name is a void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Check if a (lower-cased) tag name is a raw-text element.
pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// An attribute value together with the quote character it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrValue {
    pub text: String,
    /// `None` for unquoted values.
    pub quote: Option<char>,
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quote {
            Some(q) => write!(f, "{q}{}{q}", self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// Tag attribute: `name ['=' value]`. A missing value is a boolean attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAttribute {
    pub name: String,
    pub value: Option<AttrValue>,
}

impl fmt::Display for TagAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(value) = &self.value {
            write!(f, "={value}")?;
        }
        Ok(())
    }
}

/// Start tag: `'<' name attribute* ['/'] '>'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lower-cased tag name.
    pub name: String,
    /// Attributes in source order. Names are unique ignoring ASCII case.
    pub attributes: Vec<TagAttribute>,
    /// Written with a trailing `/` (only legal on void elements).
    pub self_closing: bool,
    /// The tag exactly as it appeared in the input.
    pub source: String,
}

impl StartTag {
    /// Build a start tag that was not read from input. Its source text is the
    /// canonical form: one space between attributes and ` />` when
    /// self-closing.
    pub fn new(name: impl Into<String>, attributes: Vec<TagAttribute>, self_closing: bool) -> Self {
        let name = name.into();
        let mut source = format!("<{name}");
        for attr in &attributes {
            source.push(' ');
            source.push_str(&attr.to_string());
        }
        if self_closing {
            source.push_str(" /");
        }
        source.push('>');

        Self {
            name,
            attributes,
            self_closing,
            source,
        }
    }

    /// Look up an attribute by name, ignoring ASCII case.
    pub fn attribute(&self, name: &str) -> Option<&TagAttribute> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for StartTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// End tag: `'</' name '>'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTag {
    pub name: String,
}

impl fmt::Display for EndTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "</{}>", self.name)
    }
}

/// One top-level token of a doctype declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoctypeToken {
    /// A bare word or a quoted string (quotes included).
    Bare(String),
    /// `name=value`
    Pair(String, String),
}

impl fmt::Display for DoctypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoctypeToken::Bare(text) => f.write_str(text),
            DoctypeToken::Pair(name, value) => write!(f, "{name}={value}"),
        }
    }
}

/// Doctype declaration: `'<!' DOCTYPE token* '>'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    /// The `DOCTYPE` keyword as written.
    pub keyword: String,
    pub tokens: Vec<DoctypeToken>,
    /// The declaration exactly as it appeared in the input.
    pub source: String,
}

impl Doctype {
    /// Build a doctype that was not read from input, with tokens separated by
    /// single spaces.
    pub fn new(keyword: impl Into<String>, tokens: Vec<DoctypeToken>) -> Self {
        let keyword = keyword.into();
        let mut source = format!("<!{keyword}");
        for token in &tokens {
            source.push(' ');
            source.push_str(&token.to_string());
        }
        source.push('>');

        Self {
            keyword,
            tokens,
            source,
        }
    }
}

impl fmt::Display for Doctype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Template language of an embedded code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// `<?php ... ?>` or `<? ... ?>`
    Php,
    /// `<%= ... %>`
    Ruby,
}

impl CodeKind {
    pub fn opener(self) -> &'static str {
        match self {
            CodeKind::Php => "<?",
            CodeKind::Ruby => "<%=",
        }
    }

    pub fn closer(self) -> &'static str {
        match self {
            CodeKind::Php => "?>",
            CodeKind::Ruby => "%>",
        }
    }
}

/// Embedded template code, captured verbatim between its delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedCode {
    pub kind: CodeKind,
    /// Opening delimiter as written, e.g. `<?`, `<?php`, `<?PHP` or `<%=`.
    pub opener: String,
    pub text: String,
}

impl fmt::Display for EmbeddedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.opener, self.text, self.kind.closer())
    }
}

/// A parsed lexical production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Doctype(Doctype),
    StartTag(StartTag),
    EndTag(EndTag),
    /// Comment body between `<!--` and `-->`.
    Comment(String),
    EmbeddedCode(EmbeddedCode),
    Text(String),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Doctype(doctype) => write!(f, "{doctype}"),
            Entity::StartTag(tag) => write!(f, "{tag}"),
            Entity::EndTag(tag) => write!(f, "{tag}"),
            Entity::Comment(text) => write!(f, "<!--{text}-->"),
            Entity::EmbeddedCode(code) => write!(f, "{code}"),
            Entity::Text(text) => f.write_str(text),
        }
    }
}
