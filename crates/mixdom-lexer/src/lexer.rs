//! Lexical productions.
//!
//! Each function expects the cursor to sit on the first character of its
//! production and leaves it just past the production. Malformed input yields a
//! [`SyntaxError`] located at the offending character.

use crate::cursor::{Bookmark, Cursor};
use crate::entity::{
    is_void_element, AttrValue, CodeKind, Doctype, DoctypeToken, EmbeddedCode, EndTag, Entity,
    StartTag, TagAttribute,
};
use crate::SyntaxError;

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Characters allowed in an unquoted attribute value.
fn is_unquoted_value_char(c: char) -> bool {
    !is_space(c) && !matches!(c, '/' | '=' | '>' | '<' | '`')
}

// =========================================================================
// Terminals
// =========================================================================

/// whitespace: `[ \t\r\n]*`
pub fn whitespace<'a>(cursor: &mut Cursor<'a>) -> &'a str {
    let start = cursor.offset();
    while !cursor.at_end() && is_space(cursor.peek()) {
        cursor.advance();
    }
    cursor.slice_from(start)
}

/// identifier: `[a-z0-9][a-z0-9_-]*`
pub fn identifier<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, SyntaxError> {
    if !cursor.peek().is_ascii_alphanumeric() {
        return Err(cursor.error("Expected identifier name"));
    }

    let start = cursor.offset();
    while !cursor.at_end() && is_identifier_char(cursor.peek()) {
        cursor.advance();
    }
    Ok(cursor.slice_from(start))
}

/// tag_name: `[a-z][a-z0-9]*`, lower-cased.
pub fn tag_name(cursor: &mut Cursor<'_>) -> Result<String, SyntaxError> {
    if !cursor.peek().is_ascii_alphabetic() {
        return Err(cursor.error("Tag name must begin with an alpha character"));
    }

    let start = cursor.offset();
    while !cursor.at_end() && cursor.peek().is_ascii_alphanumeric() {
        cursor.advance();
    }
    Ok(cursor.slice_from(start).to_ascii_lowercase())
}

/// string: `'"' [^"]* '"' | "'" [^']* "'"`
///
/// Returns the quote character and the text between the quotes. A missing
/// closing quote lets the string run to the end of input.
pub fn quoted_string<'a>(cursor: &mut Cursor<'a>) -> Result<(char, &'a str), SyntaxError> {
    let quote = cursor.peek();
    if quote != '"' && quote != '\'' {
        return Err(cursor.error("Expected string literal"));
    }
    cursor.advance();

    let start = cursor.offset();
    while !cursor.at_end() && cursor.peek() != quote {
        cursor.advance();
    }
    let text = cursor.slice_from(start);
    cursor.advance();

    Ok((quote, text))
}

/// text: `[^<]*`
pub fn raw_text<'a>(cursor: &mut Cursor<'a>) -> &'a str {
    let start = cursor.offset();
    while !cursor.at_end() && cursor.peek() != '<' {
        cursor.advance();
    }
    cursor.slice_from(start)
}

/// cdata: everything up to (not including) `delimiter`, matched ignoring
/// ASCII case.
pub fn cdata_until<'a>(cursor: &mut Cursor<'a>, delimiter: &str) -> Result<&'a str, SyntaxError> {
    let start = cursor.offset();
    let first = delimiter.chars().next().unwrap_or(crate::cursor::EOF_CHAR);

    while !cursor.at_end() {
        if cursor.peek().eq_ignore_ascii_case(&first) && cursor.matches(delimiter) {
            return Ok(cursor.slice_from(start));
        }
        cursor.advance();
    }

    Err(cursor.error(format!(
        "EOF found while parsing CDATA, ending delimiter '{delimiter}' not found"
    )))
}

/// Consume exactly `expected`, failing on the first character that differs.
pub fn literal(cursor: &mut Cursor<'_>, expected: &str) -> Result<(), SyntaxError> {
    for ch in expected.chars() {
        if cursor.at_end() || cursor.peek() != ch {
            let found = if cursor.at_end() {
                "end of input".to_string()
            } else {
                format!("'{}'", cursor.peek())
            };
            return Err(cursor.error(format!("Expecting '{expected}' found {found}")));
        }
        cursor.advance();
    }
    Ok(())
}

// =========================================================================
// Entities
// =========================================================================

/// attribute: `identifier [ '=' (string | unquoted) ]`
pub fn attribute(cursor: &mut Cursor<'_>) -> Result<TagAttribute, SyntaxError> {
    whitespace(cursor);
    let name = identifier(cursor)?.to_string();
    whitespace(cursor);

    if cursor.peek() != '=' {
        return Ok(TagAttribute { name, value: None });
    }
    cursor.advance();
    whitespace(cursor);

    if matches!(cursor.peek(), '"' | '\'') {
        let (quote, text) = quoted_string(cursor)?;
        return Ok(TagAttribute {
            name,
            value: Some(AttrValue {
                text: text.to_string(),
                quote: Some(quote),
            }),
        });
    }

    let c = cursor.peek();
    if matches!(c, '=' | '>' | '<' | '`') {
        return Err(cursor.error(format!(
            "Expecting unquoted value for attribute '{name}' found illegal character '{c}'"
        )));
    }

    let start = cursor.offset();
    while !cursor.at_end() && is_unquoted_value_char(cursor.peek()) {
        cursor.advance();
    }
    let text = cursor.slice_from(start);
    if text.is_empty() {
        return Err(cursor.error(format!("Illegal or missing value for attribute '{name}'")));
    }

    Ok(TagAttribute {
        name,
        value: Some(AttrValue {
            text: text.to_string(),
            quote: None,
        }),
    })
}

/// start_tag: `'<' tag_name attribute* ['/'] '>'`
pub fn start_tag(cursor: &mut Cursor<'_>) -> Result<StartTag, SyntaxError> {
    let start = cursor.offset();
    literal(cursor, "<")?;
    let name = tag_name(cursor)?;

    let mut attributes: Vec<TagAttribute> = Vec::new();
    whitespace(cursor);
    while !cursor.at_end() && !matches!(cursor.peek(), '<' | '/' | '>') {
        let attr = attribute(cursor)?;
        if attributes
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case(&attr.name))
        {
            return Err(cursor.error(format!("Attribute '{}' already defined", attr.name)));
        }
        attributes.push(attr);
        whitespace(cursor);
    }

    let mut self_closing = false;
    if cursor.peek() == '/' {
        if !is_void_element(&name) {
            return Err(cursor.error("Illegal '/' character for non-void element tag"));
        }
        cursor.advance();
        self_closing = true;
    }
    literal(cursor, ">")?;

    Ok(StartTag {
        name,
        attributes,
        self_closing,
        source: cursor.slice_from(start).to_string(),
    })
}

/// end_tag: `'</' tag_name '>'`
pub fn end_tag(cursor: &mut Cursor<'_>) -> Result<EndTag, SyntaxError> {
    literal(cursor, "</")?;
    let name = tag_name(cursor)?;
    whitespace(cursor);
    literal(cursor, ">")?;

    Ok(EndTag { name })
}

/// comment: `'<!--' cdata '-->'`
pub fn comment(cursor: &mut Cursor<'_>) -> Result<String, SyntaxError> {
    literal(cursor, "<!--")?;
    let text = cdata_until(cursor, "-->")?;
    literal(cursor, "-->")?;

    Ok(text.to_string())
}

/// php: `'<?' ['php'] cdata '?>'`
pub fn php_code(cursor: &mut Cursor<'_>) -> Result<EmbeddedCode, SyntaxError> {
    let start = cursor.offset();
    literal(cursor, "<?")?;
    if cursor.matches("php") {
        cursor.skip(3);
    }
    let opener = cursor.slice_from(start).to_string();

    let text = cdata_until(cursor, CodeKind::Php.closer())?;
    literal(cursor, CodeKind::Php.closer())?;

    Ok(EmbeddedCode {
        kind: CodeKind::Php,
        opener,
        text: text.to_string(),
    })
}

/// ruby: `'<%=' cdata '%>'`
pub fn ruby_code(cursor: &mut Cursor<'_>) -> Result<EmbeddedCode, SyntaxError> {
    literal(cursor, CodeKind::Ruby.opener())?;
    let text = cdata_until(cursor, CodeKind::Ruby.closer())?;
    literal(cursor, CodeKind::Ruby.closer())?;

    Ok(EmbeddedCode {
        kind: CodeKind::Ruby,
        opener: CodeKind::Ruby.opener().to_string(),
        text: text.to_string(),
    })
}

/// doctype: `'<!' 'DOCTYPE' (token ['=' token])* ['/'] '>'`
pub fn doctype(cursor: &mut Cursor<'_>) -> Result<Doctype, SyntaxError> {
    let start = cursor.offset();
    literal(cursor, "<!")?;

    let keyword = identifier(cursor)?;
    if !keyword.eq_ignore_ascii_case("DOCTYPE") {
        return Err(cursor.error("Expecting doctype declaration"));
    }
    let keyword = keyword.to_string();
    whitespace(cursor);

    let mut tokens = Vec::new();
    while !cursor.at_end() && !at_doctype_end(cursor) {
        let name = doctype_token(cursor)?;
        whitespace(cursor);

        if cursor.peek() == '=' {
            cursor.advance();
            whitespace(cursor);
            let value = doctype_token(cursor)?;
            whitespace(cursor);
            tokens.push(DoctypeToken::Pair(name, value));
        } else {
            tokens.push(DoctypeToken::Bare(name));
        }
    }

    if cursor.peek() == '/' {
        cursor.advance();
    }
    literal(cursor, ">")?;

    Ok(Doctype {
        keyword,
        tokens,
        source: cursor.slice_from(start).to_string(),
    })
}

fn at_doctype_end(cursor: &Cursor<'_>) -> bool {
    cursor.peek() == '>' || (cursor.peek() == '/' && cursor.peek_next() == '>')
}

/// A doctype token is a quoted string (kept with its quotes) or a run of
/// characters up to whitespace, `=`, `>` or `/>`.
fn doctype_token(cursor: &mut Cursor<'_>) -> Result<String, SyntaxError> {
    if matches!(cursor.peek(), '"' | '\'') {
        let (quote, text) = quoted_string(cursor)?;
        return Ok(format!("{quote}{text}{quote}"));
    }

    let start = cursor.offset();
    while !cursor.at_end()
        && !is_space(cursor.peek())
        && cursor.peek() != '='
        && !at_doctype_end(cursor)
    {
        cursor.advance();
    }
    Ok(cursor.slice_from(start).to_string())
}

/// entity: doctype | comment | end_tag | php | ruby | start_tag | text
///
/// Leading whitespace is skipped. The returned bookmark points at the first
/// character of the entity, so callers can push it back onto the input.
pub fn entity(cursor: &mut Cursor<'_>) -> Result<(Bookmark, Entity), SyntaxError> {
    whitespace(cursor);
    let mark = cursor.bookmark();

    let entity = if cursor.peek() == '<' {
        match cursor.peek_next() {
            '!' if cursor.matches("<!d") => Entity::Doctype(doctype(cursor)?),
            '!' => Entity::Comment(comment(cursor)?),
            '/' => Entity::EndTag(end_tag(cursor)?),
            '?' => Entity::EmbeddedCode(php_code(cursor)?),
            '%' => Entity::EmbeddedCode(ruby_code(cursor)?),
            _ => Entity::StartTag(start_tag(cursor)?),
        }
    } else {
        Entity::Text(raw_text(cursor).to_string())
    };

    log::trace!(target: "mixdom::lexer", "lexed entity: {entity:?}");
    Ok((mark, entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: lex a single entity and panic on error.
    fn lex(source: &str) -> Entity {
        let mut cursor = Cursor::new(source);
        entity(&mut cursor).unwrap().1
    }

    /// Helper: lex a single entity and return the error message.
    fn lex_err(source: &str) -> String {
        let mut cursor = Cursor::new(source);
        entity(&mut cursor).unwrap_err().message
    }

    fn start(source: &str) -> StartTag {
        match lex(source) {
            Entity::StartTag(tag) => tag,
            other => panic!("expected start tag, got {other:?}"),
        }
    }

    // =========================================================================
    // Terminals
    // =========================================================================

    #[test]
    fn test_whitespace_run() {
        let mut c = Cursor::new(" \t\r\n x");
        assert_eq!(whitespace(&mut c), " \t\r\n ");
        assert_eq!(c.peek(), 'x');
    }

    #[test]
    fn test_identifier() {
        let mut c = Cursor::new("data-x_1=");
        assert_eq!(identifier(&mut c).unwrap(), "data-x_1");
        assert_eq!(c.peek(), '=');
    }

    #[test]
    fn test_identifier_may_start_with_digit() {
        let mut c = Cursor::new("1a");
        assert_eq!(identifier(&mut c).unwrap(), "1a");
    }

    #[test]
    fn test_identifier_rejects_punctuation() {
        let mut c = Cursor::new("-x");
        assert_eq!(
            identifier(&mut c).unwrap_err().message,
            "Expected identifier name"
        );
    }

    #[test]
    fn test_tag_name_lowercases() {
        let mut c = Cursor::new("DiV2 ");
        assert_eq!(tag_name(&mut c).unwrap(), "div2");
    }

    #[test]
    fn test_tag_name_needs_alpha_start() {
        let mut c = Cursor::new("2div");
        assert!(tag_name(&mut c).is_err());
    }

    #[test]
    fn test_quoted_string() {
        let mut c = Cursor::new("'a \"b\"' rest");
        assert_eq!(quoted_string(&mut c).unwrap(), ('\'', "a \"b\""));
        assert_eq!(c.peek(), ' ');
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let mut c = Cursor::new("\"abc");
        assert_eq!(quoted_string(&mut c).unwrap(), ('"', "abc"));
        assert!(c.at_end());
    }

    #[test]
    fn test_raw_text_stops_at_lt() {
        let mut c = Cursor::new("a b\nc<p>");
        assert_eq!(raw_text(&mut c), "a b\nc");
        assert_eq!(c.peek(), '<');
    }

    #[test]
    fn test_cdata_until_first_full_delimiter() {
        let mut c = Cursor::new(" a -- b -->");
        assert_eq!(cdata_until(&mut c, "-->").unwrap(), " a -- b ");
        assert!(c.matches("-->"));
    }

    #[test]
    fn test_cdata_until_ignores_case() {
        let mut c = Cursor::new("x</SCRIPT>");
        assert_eq!(cdata_until(&mut c, "</script>").unwrap(), "x");
    }

    #[test]
    fn test_cdata_unterminated() {
        let mut c = Cursor::new("never ends");
        let err = cdata_until(&mut c, "?>").unwrap_err();
        assert!(err.message.contains("'?>' not found"));
    }

    #[test]
    fn test_literal_mismatch() {
        let mut c = Cursor::new("<x");
        let err = literal(&mut c, "</").unwrap_err();
        assert_eq!(err.message, "Expecting '</' found 'x'");
        assert_eq!(err.column, 2);
    }

    #[test]
    fn test_literal_at_end() {
        let mut c = Cursor::new("");
        let err = literal(&mut c, ">").unwrap_err();
        assert_eq!(err.message, "Expecting '>' found end of input");
    }

    // =========================================================================
    // Attributes and start tags
    // =========================================================================

    #[test]
    fn test_start_tag_plain() {
        let tag = start("<DIV>");
        assert_eq!(tag.name, "div");
        assert!(tag.attributes.is_empty());
    }

    #[test]
    fn test_start_tag_attributes() {
        let tag = start("<input type=\"text\" value='v' size=10 disabled>");
        assert_eq!(tag.attributes.len(), 4);
        assert_eq!(
            tag.attribute("value").unwrap().value,
            Some(AttrValue {
                text: "v".into(),
                quote: Some('\'')
            })
        );
        assert_eq!(tag.attribute("size").unwrap().value.as_ref().unwrap().quote, None);
        assert!(tag.attribute("disabled").unwrap().value.is_none());
        assert_eq!(
            tag.to_string(),
            "<input type=\"text\" value='v' size=10 disabled>"
        );
    }

    #[test]
    fn test_whitespace_around_equals() {
        let tag = start("<a href = \"x\" >");
        assert_eq!(tag.attribute("href").unwrap().value.as_ref().unwrap().text, "x");
        assert_eq!(tag.to_string(), "<a href = \"x\" >");
    }

    #[test]
    fn test_whitespace_before_close() {
        assert_eq!(start("<div >").name, "div");
    }

    #[test]
    fn test_duplicate_attribute_is_fatal() {
        let msg = lex_err("<a href='x' href='y'>");
        assert_eq!(msg, "Attribute 'href' already defined");
    }

    #[test]
    fn test_duplicate_attribute_ignores_case() {
        assert!(lex_err("<a id=1 ID=2>").contains("'ID'"));
    }

    #[test]
    fn test_illegal_unquoted_value() {
        let msg = lex_err("<a href=>");
        assert!(msg.contains("illegal character '>'"));
        assert!(lex_err("<a href=`x`>").contains("illegal character '`'"));
    }

    #[test]
    fn test_empty_unquoted_value() {
        assert!(lex_err("<a href=/x>").contains("Illegal or missing value for attribute 'href'"));
    }

    #[test]
    fn test_self_closing_void() {
        let tag = start("<br/>");
        assert!(tag.self_closing);
        assert_eq!(tag.to_string(), "<br/>");
        assert_eq!(start("<img src=\"a.png\" />").to_string(), "<img src=\"a.png\" />");
    }

    #[test]
    fn test_start_tag_keeps_source_spacing() {
        let tag = start("<P  class=\"a\"\n   id='b'  >");
        assert_eq!(tag.name, "p");
        assert_eq!(tag.attributes.len(), 2);
        assert_eq!(tag.to_string(), "<P  class=\"a\"\n   id='b'  >");
    }

    #[test]
    fn test_self_closing_non_void_is_fatal() {
        assert_eq!(
            lex_err("<div/>"),
            "Illegal '/' character for non-void element tag"
        );
    }

    #[test]
    fn test_start_tag_unterminated() {
        assert_eq!(lex_err("<p"), "Expecting '>' found end of input");
    }

    // =========================================================================
    // Other entities
    // =========================================================================

    #[test]
    fn test_end_tag() {
        assert_eq!(lex("</P >"), Entity::EndTag(EndTag { name: "p".into() }));
    }

    #[test]
    fn test_comment() {
        assert_eq!(lex("<!-- a -- b -->"), Entity::Comment(" a -- b ".into()));
    }

    #[test]
    fn test_comment_unterminated() {
        assert!(lex_err("<!-- oops").contains("'-->' not found"));
    }

    #[test]
    fn test_php_with_marker() {
        let Entity::EmbeddedCode(code) = lex("<?php echo 1; ?>") else {
            panic!("expected code");
        };
        assert_eq!(code.kind, CodeKind::Php);
        assert_eq!(code.opener, "<?php");
        assert_eq!(code.text, " echo 1; ");
    }

    #[test]
    fn test_php_short_and_uppercase() {
        assert_eq!(lex("<?= $x ?>").to_string(), "<?= $x ?>");
        assert_eq!(lex("<?PHP x ?>").to_string(), "<?PHP x ?>");
    }

    #[test]
    fn test_php_containing_markup() {
        let Entity::EmbeddedCode(code) = lex("<?php if ($a > 1) echo '<b>'; ?>") else {
            panic!("expected code");
        };
        assert_eq!(code.text, " if ($a > 1) echo '<b>'; ");
    }

    #[test]
    fn test_ruby() {
        let Entity::EmbeddedCode(code) = lex("<%= @user.name %>") else {
            panic!("expected code");
        };
        assert_eq!(code.kind, CodeKind::Ruby);
        assert_eq!(code.text, " @user.name ");
    }

    #[test]
    fn test_ruby_requires_equals() {
        assert_eq!(lex_err("<% x %>"), "Expecting '<%=' found ' '");
    }

    #[test]
    fn test_doctype() {
        let Entity::Doctype(dt) = lex("<!DOCTYPE html>") else {
            panic!("expected doctype");
        };
        assert_eq!(dt.keyword, "DOCTYPE");
        assert_eq!(dt.tokens, vec![DoctypeToken::Bare("html".into())]);
        assert_eq!(dt.to_string(), "<!DOCTYPE html>");
    }

    #[test]
    fn test_doctype_lowercase_keyword() {
        assert_eq!(lex("<!doctype html>").to_string(), "<!doctype html>");
    }

    #[test]
    fn test_doctype_keeps_source_spacing() {
        let Entity::Doctype(dt) = lex("<!DOCTYPE  html  />") else {
            panic!("expected doctype");
        };
        assert_eq!(dt.tokens, vec![DoctypeToken::Bare("html".into())]);
        assert_eq!(dt.to_string(), "<!DOCTYPE  html  />");
    }

    #[test]
    fn test_doctype_pairs_and_quotes() {
        let Entity::Doctype(dt) = lex(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" x = y />",
        ) else {
            panic!("expected doctype");
        };
        assert_eq!(
            dt.tokens,
            vec![
                DoctypeToken::Bare("html".into()),
                DoctypeToken::Bare("PUBLIC".into()),
                DoctypeToken::Bare("\"-//W3C//DTD XHTML 1.0 Strict//EN\"".into()),
                DoctypeToken::Pair("x".into(), "y".into()),
            ]
        );
    }

    #[test]
    fn test_not_a_doctype() {
        assert_eq!(lex_err("<!DATA x>"), "Expecting doctype declaration");
    }

    #[test]
    fn test_text_entity() {
        assert_eq!(lex("  hello world <b>"), Entity::Text("hello world ".into()));
    }

    #[test]
    fn test_entity_bookmark_after_whitespace() {
        let mut c = Cursor::new("\n  </p>");
        let (mark, entity) = entity(&mut c).unwrap();
        assert_eq!(entity, Entity::EndTag(EndTag { name: "p".into() }));
        assert_eq!(mark.position().line, 2);
        assert_eq!(mark.position().column, 3);

        c.restore(mark);
        assert!(c.matches("</p>"));
    }

    #[test]
    fn test_error_reports_source_line() {
        let mut c = Cursor::new("<p>\n<a b=>");
        entity(&mut c).unwrap();
        let err = entity(&mut c).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.source_line, "<a b=>");
    }
}
