//! Parsing strategy module
//!
//! The core parser is synchronous and single-threaded; each call owns its
//! own cursor state. That independence is what the batch strategy builds
//! on: many documents, one parse per rayon worker.

pub mod parallel;
