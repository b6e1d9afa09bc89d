//! ResourceArc wrappers
//!
//! Persistent state handed back to the VM: parsed documents and the
//! bounded parse cache. Documents are immutable after parsing, so only
//! the cache needs a mutex.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use rustler::ResourceArc;

use crate::cache::ParseCache;
use crate::dom::SsmlDocument;

/// Wrapper for a parsed document stored in a ResourceArc
pub struct DocumentResource {
    pub doc: SsmlDocument,
}

impl DocumentResource {
    pub fn new(doc: SsmlDocument) -> Self {
        DocumentResource { doc }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for the document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;

/// Wrapper for a ParseCache that can be shared across NIF calls
pub struct ParseCacheResource {
    pub inner: Mutex<ParseCache>,
}

impl ParseCacheResource {
    pub fn new(item_limit: NonZeroUsize) -> Self {
        ParseCacheResource {
            inner: Mutex::new(ParseCache::new(item_limit)),
        }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for ParseCacheResource {}

/// Type alias for the cache ResourceArc
pub type ParseCacheRef = ResourceArc<ParseCacheResource>;
