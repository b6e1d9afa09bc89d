//! DOM module - SSML document tree
//!
//! Implements the document model as a closed two-variant sum type with
//! insertion-ordered attribute maps, plus the serializer that walks a
//! tree back into markup text.

pub mod document;
pub mod node;
pub mod serializer;

pub use document::SsmlDocument;
pub use node::{AttributeMap, SsmlNode, SsmlTag, SsmlText};
