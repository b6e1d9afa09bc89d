//! Owned parse result
//!
//! A document owns its root tag; it is built exactly once per parse call
//! and never mutated afterward. Resources and the parse cache store whole
//! documents.

use crate::core::error::SsmlError;
use crate::core::parser::parse_document;

use super::node::SsmlTag;
use super::serializer::serialize_tag;

/// A successfully parsed SSML document
#[derive(Debug, Clone, PartialEq)]
pub struct SsmlDocument {
    root: SsmlTag,
}

impl SsmlDocument {
    /// Parse a complete document
    pub fn parse(input: &str) -> Result<Self, SsmlError> {
        Ok(SsmlDocument {
            root: parse_document(input)?,
        })
    }

    /// Get the root element
    pub fn root(&self) -> &SsmlTag {
        &self.root
    }

    /// Get the root element name (always "speak" for parsed documents)
    pub fn root_name(&self) -> &str {
        &self.root.name
    }

    /// Serialize the document back to markup text
    pub fn to_markup(&self) -> String {
        serialize_tag(&self.root)
    }
}
