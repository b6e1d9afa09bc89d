//! Bounded parse cache
//!
//! LRU cache from document text to its parsed tree. Every lookup —
//! `contains`, `get`, or an insert through `get_or_parse` — refreshes the
//! entry's recency; the least recently used entry is evicted once the
//! item limit is reached. Parse failures are never cached.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::core::error::SsmlError;
use crate::dom::SsmlDocument;

/// LRU cache of parsed documents keyed by their source text
pub struct ParseCache {
    entries: LruCache<String, Arc<SsmlDocument>>,
}

impl ParseCache {
    /// Create a cache holding at most `item_limit` documents
    pub fn new(item_limit: NonZeroUsize) -> Self {
        ParseCache {
            entries: LruCache::new(item_limit),
        }
    }

    /// Check for a cached parse of `document`, refreshing its recency
    pub fn contains(&mut self, document: &str) -> bool {
        self.entries.get(document).is_some()
    }

    /// Get the cached parse of `document`, refreshing its recency
    pub fn get(&mut self, document: &str) -> Option<Arc<SsmlDocument>> {
        self.entries.get(document).cloned()
    }

    /// Get the cached parse of `document`, parsing and caching on a miss
    pub fn get_or_parse(&mut self, document: &str) -> Result<Arc<SsmlDocument>, SsmlError> {
        if let Some(doc) = self.get(document) {
            return Ok(doc);
        }
        let parsed = Arc::new(SsmlDocument::parse(document)?);
        self.entries.put(document.to_string(), Arc::clone(&parsed));
        Ok(parsed)
    }

    /// Number of cached documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all cached documents
    pub fn clear(&mut self) {
        self.entries.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(limit: usize) -> ParseCache {
        ParseCache::new(NonZeroUsize::new(limit).unwrap())
    }

    #[test]
    fn test_miss_parses_and_caches() {
        let mut cache = cache(4);
        assert!(!cache.contains("<speak>a</speak>"));

        let doc = cache.get_or_parse("<speak>a</speak>").unwrap();
        assert_eq!(doc.root_name(), "speak");
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("<speak>a</speak>"));
    }

    #[test]
    fn test_hit_returns_same_parse() {
        let mut cache = cache(4);
        let first = cache.get_or_parse("<speak>a</speak>").unwrap();
        let second = cache.get_or_parse("<speak>a</speak>").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = cache(4);
        assert_eq!(
            cache.get_or_parse("<speak/>"),
            Err(SsmlError::SelfClosingNotSupported)
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_at_item_limit() {
        let mut cache = cache(2);
        cache.get_or_parse("<speak>1</speak>").unwrap();
        cache.get_or_parse("<speak>2</speak>").unwrap();
        cache.get_or_parse("<speak>3</speak>").unwrap();
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("<speak>1</speak>"));
        assert!(cache.contains("<speak>2</speak>"));
        assert!(cache.contains("<speak>3</speak>"));
    }

    #[test]
    fn test_lookup_refreshes_recency() {
        let mut cache = cache(2);
        cache.get_or_parse("<speak>1</speak>").unwrap();
        cache.get_or_parse("<speak>2</speak>").unwrap();
        // Touch the older entry, then insert a third; the middle one goes
        assert!(cache.contains("<speak>1</speak>"));
        cache.get_or_parse("<speak>3</speak>").unwrap();
        assert!(cache.contains("<speak>1</speak>"));
        assert!(!cache.contains("<speak>2</speak>"));
    }

    #[test]
    fn test_clear() {
        let mut cache = cache(2);
        cache.get_or_parse("<speak>1</speak>").unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
