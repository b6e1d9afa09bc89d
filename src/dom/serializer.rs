//! Tree to markup serialization
//!
//! A pure walk over the node tree producing a fresh string. Text content
//! is re-escaped; attribute values are written back verbatim, mirroring
//! the parser's read path, which never unescapes them.

use crate::core::entities::escape_into;

use super::node::{SsmlNode, SsmlTag};

/// Serialize a node (and its subtree) to markup text
pub fn serialize(node: &SsmlNode) -> String {
    let mut buf = String::with_capacity(64);
    serialize_into(node, &mut buf);
    buf
}

/// Serialize a tag node to markup text
pub fn serialize_tag(tag: &SsmlTag) -> String {
    let mut buf = String::with_capacity(64);
    tag_into(tag, &mut buf);
    buf
}

fn serialize_into(node: &SsmlNode, buf: &mut String) {
    match node {
        SsmlNode::Text(text) => escape_into(&text.content, buf),
        SsmlNode::Tag(tag) => tag_into(tag, buf),
    }
}

fn tag_into(tag: &SsmlTag, buf: &mut String) {
    buf.push('<');
    buf.push_str(&tag.name);
    for (key, value) in &tag.attributes {
        buf.push(' ');
        buf.push_str(key);
        buf.push_str("=\"");
        buf.push_str(value);
        buf.push('"');
    }
    buf.push('>');
    for child in &tag.children {
        serialize_into(child, buf);
    }
    buf.push_str("</");
    buf.push_str(&tag.name);
    buf.push('>');
}
