//! Recursive-descent SSML parser
//!
//! One method per grammar production, all built directly on the cursor:
//! name, attribute value, attribute list, text run, open tag, close tag,
//! element. The element rule recurses for nested content; recursion depth
//! equals the nesting depth of the input markup.
//!
//! Any rule failure aborts the whole parse. There is no recovery and no
//! partial result.

use indexmap::IndexMap;

use super::cursor::Cursor;
use super::entities::unescape;
use super::error::SsmlError;
use crate::dom::node::{AttributeMap, SsmlNode, SsmlTag, SsmlText};

/// Check if a character may appear in a tag or attribute name
#[inline]
fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, ':' | '-' | '_')
}

/// Parse a complete document into its root tag
pub fn parse_document(input: &str) -> Result<SsmlTag, SsmlError> {
    Parser::new(input).parse()
}

/// Recursive-descent parser over a cursor
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            cursor: Cursor::new(input),
        }
    }

    /// Top-level rule: exactly one <speak> element, optionally surrounded
    /// by whitespace
    pub fn parse(mut self) -> Result<SsmlTag, SsmlError> {
        self.cursor.skip_spaces();
        if self.cursor.peek() != Some('<') {
            return Err(SsmlError::MissingRootSpeakTag);
        }
        let root = self.element()?;
        if root.name != "speak" {
            return Err(SsmlError::MissingRootSpeakTag);
        }
        self.cursor.skip_spaces();
        if !self.cursor.is_eof() {
            return Err(SsmlError::TrailingContentAfterRoot);
        }
        Ok(root)
    }

    /// Element rule: open tag, children (nested elements and text runs),
    /// matching close tag
    fn element(&mut self) -> Result<SsmlTag, SsmlError> {
        let (name, attributes) = self.open_tag()?;
        let mut children = Vec::new();

        loop {
            if self.cursor.is_eof() {
                return Err(SsmlError::MissingClosingTag);
            }
            if self.cursor.peek() == Some('<') {
                if self.cursor.peek_byte_at(1) == Some(b'/') {
                    break;
                }
                children.push(SsmlNode::Tag(self.element()?));
            } else {
                let text = self.text_run();
                // Runs that unescape to nothing are dropped
                if !text.is_empty() {
                    children.push(SsmlNode::Text(SsmlText::new(text)));
                }
            }
        }

        self.close_tag(&name)?;
        Ok(SsmlTag {
            name,
            attributes,
            children,
        })
    }

    /// Open-tag rule: `<`, name, attribute list, `>`
    fn open_tag(&mut self) -> Result<(String, AttributeMap), SsmlError> {
        self.cursor.expect('<')?;
        self.cursor.skip_spaces();
        let name = self.name()?;
        self.cursor.skip_spaces();
        let attributes = self.attributes()?;
        self.cursor.skip_spaces();
        if self.cursor.peek() == Some('/') {
            return Err(SsmlError::SelfClosingNotSupported);
        }
        self.cursor.expect('>')?;
        Ok((name, attributes))
    }

    /// Close-tag rule: `</`, name matching the open tag, `>`
    fn close_tag(&mut self, expected: &str) -> Result<(), SsmlError> {
        self.cursor.expect('<')?;
        if self.cursor.peek() != Some('/') {
            return Err(SsmlError::MissingClosingTag);
        }
        self.cursor.expect('/')?;
        self.cursor.skip_spaces();
        let name = self.name()?;
        if name != expected {
            return Err(SsmlError::MismatchedClosingTag {
                expected: expected.to_string(),
                found: name,
            });
        }
        self.cursor.skip_spaces();
        self.cursor.expect('>')?;
        Ok(())
    }

    /// Name rule: maximal run of alphanumeric characters plus ':' '-' '_'
    fn name(&mut self) -> Result<String, SsmlError> {
        self.cursor.skip_spaces();
        let start = self.cursor.position();
        while let Some(ch) = self.cursor.peek() {
            if !is_name_char(ch) {
                break;
            }
            self.cursor.consume()?;
        }
        if self.cursor.position() == start {
            return Err(SsmlError::InvalidName);
        }
        Ok(self.cursor.slice(start, self.cursor.position()).to_string())
    }

    /// Attribute-list rule: name/value pairs until '>' or '/'
    fn attributes(&mut self) -> Result<AttributeMap, SsmlError> {
        let mut attributes = IndexMap::new();
        loop {
            self.cursor.skip_spaces();
            if matches!(self.cursor.peek(), Some('>') | Some('/')) {
                break;
            }
            let key = self.name()?;
            self.cursor.skip_spaces();
            if self.cursor.peek() != Some('=') {
                return Err(SsmlError::InvalidAttribute);
            }
            self.cursor.expect('=')?;
            self.cursor.skip_spaces();
            let value = self.attribute_value()?;
            // A repeated key keeps its original position; the value is
            // overwritten by the later occurrence
            attributes.insert(key, value);
        }
        Ok(attributes)
    }

    /// Attribute-value rule: double-quoted, captured verbatim
    ///
    /// Values are not unescaped, unlike text content.
    fn attribute_value(&mut self) -> Result<String, SsmlError> {
        self.cursor.skip_spaces();
        if self.cursor.peek() != Some('"') {
            return Err(SsmlError::UnterminatedAttributeValue);
        }
        self.cursor.expect('"')?;
        let start = self.cursor.position();
        let end = self
            .cursor
            .find_byte(b'"')
            .ok_or(SsmlError::UnterminatedAttributeValue)?;
        let value = self.cursor.slice(start, end).to_string();
        self.cursor.advance_to(end);
        self.cursor.expect('"')?;
        Ok(value)
    }

    /// Text-run rule: everything up to the next '<' or the end of input,
    /// unescaped
    fn text_run(&mut self) -> String {
        let start = self.cursor.position();
        let end = self
            .cursor
            .find_byte(b'<')
            .unwrap_or_else(|| self.cursor.input_len());
        self.cursor.advance_to(end);
        unescape(self.cursor.slice(start, end)).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn text(content: &str) -> SsmlNode {
        SsmlNode::Text(SsmlText::new(content))
    }

    #[test]
    fn test_empty_root() {
        let root = parse_document("<speak></speak>").unwrap();
        assert_eq!(root.name, "speak");
        assert!(root.attributes.is_empty());
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_text_and_nested_tag() {
        let root = parse_document(r#"<speak>Hello, <break time="500ms"></break>world!</speak>"#)
            .unwrap();
        assert_eq!(
            root.children,
            vec![
                text("Hello, "),
                SsmlNode::Tag(SsmlTag {
                    name: "break".to_string(),
                    attributes: attrs(&[("time", "500ms")]),
                    children: vec![],
                }),
                text("world!"),
            ]
        );
    }

    #[test]
    fn test_text_content_is_unescaped() {
        let root = parse_document("<speak>A &lt;B&gt; &amp; C</speak>").unwrap();
        assert_eq!(root.children, vec![text("A <B> & C")]);
    }

    #[test]
    fn test_attribute_values_are_not_unescaped() {
        let root = parse_document(r#"<speak note="&lt;x&gt;"></speak>"#).unwrap();
        assert_eq!(root.attributes.get("note").map(String::as_str), Some("&lt;x&gt;"));
    }

    #[test]
    fn test_duplicate_attribute_last_wins() {
        let root = parse_document(r#"<speak a="1" a="2"></speak>"#).unwrap();
        assert_eq!(root.attributes.len(), 1);
        assert_eq!(root.attributes.get("a").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_duplicate_attribute_keeps_first_position() {
        let root = parse_document(r#"<speak a="1" b="x" a="2"></speak>"#).unwrap();
        let keys: Vec<&str> = root.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_whitespace_inside_tags() {
        let root = parse_document("<speak >< p >hi</ p ></speak>").unwrap();
        let child = root.children[0].as_tag().unwrap();
        assert_eq!(child.name, "p");
        assert_eq!(child.children, vec![text("hi")]);
    }

    #[test]
    fn test_whitespace_only_text_is_kept() {
        let root = parse_document("<speak> </speak>").unwrap();
        assert_eq!(root.children, vec![text(" ")]);
    }

    #[test]
    fn test_no_empty_text_nodes_between_tags() {
        let root = parse_document("<speak><p></p></speak>").unwrap();
        assert_eq!(root.children.len(), 1);
        assert!(root.children[0].is_tag());
    }

    #[test]
    fn test_surrounding_whitespace_allowed() {
        let root = parse_document("  <speak>x</speak>\n\t").unwrap();
        assert_eq!(root.children, vec![text("x")]);
    }

    #[test]
    fn test_name_characters() {
        let root = parse_document(r#"<speak><amazon:effect vocal-tract_1="a"></amazon:effect></speak>"#)
            .unwrap();
        let child = root.children[0].as_tag().unwrap();
        assert_eq!(child.name, "amazon:effect");
        assert_eq!(child.attributes.get("vocal-tract_1").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_no_leading_tag() {
        assert_eq!(
            parse_document("hello"),
            Err(SsmlError::MissingRootSpeakTag)
        );
    }

    #[test]
    fn test_wrong_root_name() {
        assert_eq!(
            parse_document("<p></p>"),
            Err(SsmlError::MissingRootSpeakTag)
        );
    }

    #[test]
    fn test_trailing_content() {
        assert_eq!(
            parse_document("<speak></speak>extra"),
            Err(SsmlError::TrailingContentAfterRoot)
        );
        assert_eq!(
            parse_document("<speak></speak><speak></speak>"),
            Err(SsmlError::TrailingContentAfterRoot)
        );
    }

    #[test]
    fn test_self_closing_rejected() {
        assert_eq!(
            parse_document("<speak/>"),
            Err(SsmlError::SelfClosingNotSupported)
        );
        assert_eq!(
            parse_document("<speak><break/></speak>"),
            Err(SsmlError::SelfClosingNotSupported)
        );
    }

    #[test]
    fn test_mismatched_closing_tag() {
        assert_eq!(
            parse_document("<speak><foo></bar></speak>"),
            Err(SsmlError::MismatchedClosingTag {
                expected: "foo".to_string(),
                found: "bar".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_closing_tag_at_end() {
        assert_eq!(
            parse_document("<speak>hello"),
            Err(SsmlError::MissingClosingTag)
        );
    }

    #[test]
    fn test_unterminated_name_is_invalid() {
        // "<speak" runs out of input inside the attribute list; the empty
        // name run is the first rule to fail
        assert_eq!(parse_document("<speak"), Err(SsmlError::InvalidName));
    }

    #[test]
    fn test_comment_markup_is_invalid() {
        // No comment support: '!' is not a name character
        assert_eq!(
            parse_document("<speak><!-- hi --></speak>"),
            Err(SsmlError::InvalidName)
        );
    }

    #[test]
    fn test_attribute_missing_equals() {
        assert_eq!(
            parse_document(r#"<speak a "1"></speak>"#),
            Err(SsmlError::InvalidAttribute)
        );
    }

    #[test]
    fn test_attribute_value_requires_double_quotes() {
        assert_eq!(
            parse_document("<speak a=1></speak>"),
            Err(SsmlError::UnterminatedAttributeValue)
        );
        assert_eq!(
            parse_document("<speak a='1'></speak>"),
            Err(SsmlError::UnterminatedAttributeValue)
        );
    }

    #[test]
    fn test_unterminated_attribute_value() {
        assert_eq!(
            parse_document(r#"<speak a="1></speak>"#),
            Err(SsmlError::UnterminatedAttributeValue)
        );
    }

    #[test]
    fn test_close_tag_garbage_after_name() {
        assert_eq!(
            parse_document("<speak></speak x>"),
            Err(SsmlError::UnexpectedCharacter {
                expected: '>',
                found: 'x',
            })
        );
    }

    #[test]
    fn test_input_ends_inside_close_tag() {
        assert_eq!(
            parse_document("<speak></speak"),
            Err(SsmlError::UnexpectedEndOfInput)
        );
    }

    #[test]
    fn test_deep_nesting() {
        let root = parse_document("<speak><a><b><c>x</c></b></a></speak>").unwrap();
        let a = root.children[0].as_tag().unwrap();
        let b = a.children[0].as_tag().unwrap();
        let c = b.children[0].as_tag().unwrap();
        assert_eq!(c.children, vec![text("x")]);
    }
}
