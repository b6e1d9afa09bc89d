//! Parallel batch parsing
//!
//! Uses Rayon to parse independent documents concurrently. Results come
//! back in input order; a failed document does not affect its neighbors.

use rayon::prelude::*;

use crate::core::error::SsmlError;
use crate::dom::SsmlDocument;

/// Parse multiple documents in parallel
pub fn parse_parallel(documents: &[String]) -> Vec<Result<SsmlDocument, SsmlError>> {
    documents
        .par_iter()
        .map(|document| SsmlDocument::parse(document))
        .collect()
}
