//! SSML node representation
//!
//! A document is a tree over a closed two-variant sum type: tags and text.
//! Attribute maps preserve insertion order; a repeated key within one tag
//! keeps its first position and takes the last value.

use indexmap::IndexMap;

/// Insertion-order-preserving attribute mapping
pub type AttributeMap = IndexMap<String, String>;

/// An SSML node: either an element or a run of text
#[derive(Debug, Clone, PartialEq)]
pub enum SsmlNode {
    Tag(SsmlTag),
    Text(SsmlText),
}

/// A named element with attributes and ordered children
#[derive(Debug, Clone, PartialEq)]
pub struct SsmlTag {
    pub name: String,
    pub attributes: AttributeMap,
    pub children: Vec<SsmlNode>,
}

/// A run of text content, stored unescaped
#[derive(Debug, Clone, PartialEq)]
pub struct SsmlText {
    pub content: String,
}

impl SsmlTag {
    pub fn new(
        name: impl Into<String>,
        attributes: AttributeMap,
        children: Vec<SsmlNode>,
    ) -> Self {
        SsmlTag {
            name: name.into(),
            attributes,
            children,
        }
    }

    /// Create an empty tag with no attributes or children
    pub fn named(name: impl Into<String>) -> Self {
        SsmlTag {
            name: name.into(),
            attributes: AttributeMap::new(),
            children: Vec::new(),
        }
    }
}

impl SsmlText {
    pub fn new(content: impl Into<String>) -> Self {
        SsmlText {
            content: content.into(),
        }
    }
}

impl SsmlNode {
    /// Check if this is a tag node
    #[inline]
    pub fn is_tag(&self) -> bool {
        matches!(self, SsmlNode::Tag(_))
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, SsmlNode::Text(_))
    }

    /// Get the tag node, if this is one
    pub fn as_tag(&self) -> Option<&SsmlTag> {
        match self {
            SsmlNode::Tag(tag) => Some(tag),
            SsmlNode::Text(_) => None,
        }
    }

    /// Get the text node, if this is one
    pub fn as_text(&self) -> Option<&SsmlText> {
        match self {
            SsmlNode::Tag(_) => None,
            SsmlNode::Text(text) => Some(text),
        }
    }
}
