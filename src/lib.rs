//! RustySSML - SSML parsing and serialization NIFs
//!
//! The core is a hand-written recursive-descent parser over a character
//! cursor, producing a tree of tag and text nodes, plus a serializer that
//! walks a tree back into markup. Everything here is the thin NIF shell:
//! it converts between BEAM terms and the Rust tree and calls parse or
//! serialize, nothing more.

use std::num::NonZeroUsize;

use rustler::types::atom;
use rustler::{Atom, Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod cache;
pub mod core;
pub mod dom;
pub mod resource;
pub mod strategy;
pub mod term;

use dom::SsmlDocument;
use resource::{DocumentRef, DocumentResource, ParseCacheRef, ParseCacheResource};
use term::{error_to_term, invalid_utf8, str_to_binary, tag_to_term, term_to_node};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                let mut peak = PEAK_ALLOCATED.load(Ordering::Relaxed);
                while current > peak {
                    match PEAK_ALLOCATED.compare_exchange_weak(
                        peak,
                        current,
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    ) {
                        Ok(_) => break,
                        Err(p) => peak = p,
                    }
                }
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Memory Tracking NIFs
// ============================================================================

#[cfg(feature = "memory_tracking")]
use std::sync::atomic::Ordering;

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn get_rust_memory() -> usize {
    tracking::ALLOCATED.load(Ordering::SeqCst)
}

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    tracking::PEAK_ALLOCATED.load(Ordering::SeqCst)
}

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    let current = tracking::ALLOCATED.load(Ordering::SeqCst);
    let peak = tracking::PEAK_ALLOCATED.swap(current, Ordering::SeqCst);
    (current, peak)
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn get_rust_memory() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    (0, 0)
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse an SSML document into a document resource
/// Returns {:ok, doc} or {:error, reason}
#[rustler::nif]
fn parse<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    let document = match std::str::from_utf8(input.as_slice()) {
        Ok(s) => s,
        Err(_) => return Ok((atom::error(), invalid_utf8()).encode(env)),
    };

    match SsmlDocument::parse(document) {
        Ok(doc) => {
            let arc = ResourceArc::new(DocumentResource::new(doc));
            Ok((atom::ok(), arc).encode(env))
        }
        Err(err) => Ok((atom::error(), error_to_term(env, &err)).encode(env)),
    }
}

/// Parse an SSML document straight to a tree term (no resource)
#[rustler::nif]
fn parse_to_tree<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    let document = match std::str::from_utf8(input.as_slice()) {
        Ok(s) => s,
        Err(_) => return Ok((atom::error(), invalid_utf8()).encode(env)),
    };

    match SsmlDocument::parse(document) {
        Ok(doc) => Ok((atom::ok(), tag_to_term(env, doc.root())).encode(env)),
        Err(err) => Ok((atom::error(), error_to_term(env, &err)).encode(env)),
    }
}

/// Get the root element of a parsed document as a tree term
#[rustler::nif]
fn get_root<'a>(env: Env<'a>, doc: DocumentRef) -> NifResult<Term<'a>> {
    Ok(tag_to_term(env, doc.doc.root()))
}

/// Parse many documents in parallel (one rayon task per document)
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_batch<'a>(env: Env<'a>, documents: Vec<String>) -> NifResult<Term<'a>> {
    let results = strategy::parallel::parse_parallel(&documents);

    let mut list = Term::list_new_empty(env);
    for result in results.iter().rev() {
        let entry = match result {
            Ok(doc) => (atom::ok(), tag_to_term(env, doc.root())).encode(env),
            Err(err) => (atom::error(), error_to_term(env, err)).encode(env),
        };
        list = list.list_prepend(entry);
    }
    Ok(list)
}

// ============================================================================
// Serialization
// ============================================================================

/// Serialize a parsed document back to markup
#[rustler::nif]
fn serialize<'a>(env: Env<'a>, doc: DocumentRef) -> NifResult<Term<'a>> {
    Ok(str_to_binary(env, &doc.doc.to_markup()))
}

/// Serialize a tree term built on the Elixir side
/// Returns {:ok, markup} or {:error, :unknown_node_type}
#[rustler::nif]
fn serialize_node<'a>(env: Env<'a>, node: Term<'a>) -> NifResult<Term<'a>> {
    match term_to_node(node) {
        Ok(node) => {
            let markup = dom::serializer::serialize(&node);
            Ok((atom::ok(), str_to_binary(env, &markup)).encode(env))
        }
        Err(err) => Ok((atom::error(), error_to_term(env, &err)).encode(env)),
    }
}

// ============================================================================
// Parse Cache
// ============================================================================

/// Create a bounded parse cache holding up to `item_limit` documents
#[rustler::nif]
fn cache_new(item_limit: usize) -> NifResult<ParseCacheRef> {
    let limit = NonZeroUsize::new(item_limit).ok_or(rustler::Error::BadArg)?;
    Ok(ResourceArc::new(ParseCacheResource::new(limit)))
}

/// Parse through the cache: a hit returns the cached tree and refreshes
/// its recency
#[rustler::nif]
fn cache_parse<'a>(env: Env<'a>, cache: ParseCacheRef, input: Binary<'a>) -> NifResult<Term<'a>> {
    let document = match std::str::from_utf8(input.as_slice()) {
        Ok(s) => s,
        Err(_) => return Ok((atom::error(), invalid_utf8()).encode(env)),
    };

    let mut inner = cache.inner.lock().unwrap();
    match inner.get_or_parse(document) {
        Ok(doc) => Ok((atom::ok(), tag_to_term(env, doc.root())).encode(env)),
        Err(err) => Ok((atom::error(), error_to_term(env, &err)).encode(env)),
    }
}

/// Check for a cached parse (refreshes recency, like a get)
#[rustler::nif]
fn cache_contains(cache: ParseCacheRef, input: Binary) -> bool {
    match std::str::from_utf8(input.as_slice()) {
        Ok(document) => cache.inner.lock().unwrap().contains(document),
        Err(_) => false,
    }
}

/// Number of cached documents
#[rustler::nif]
fn cache_len(cache: ParseCacheRef) -> usize {
    cache.inner.lock().unwrap().len()
}

/// Drop all cached documents
#[rustler::nif]
fn cache_clear(cache: ParseCacheRef) -> Atom {
    cache.inner.lock().unwrap().clear();
    atom::ok()
}

// ============================================================================
// NIF Initialization
// ============================================================================

#[allow(non_local_definitions)]
fn load(_env: Env, _info: Term) -> bool {
    // Resources are registered via `#[rustler::resource_impl]` in resource.rs.
    true
}

rustler::init!("Elixir.RustySSML.Native", load = load);
