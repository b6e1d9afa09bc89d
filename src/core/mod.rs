//! Core SSML parsing primitives
//!
//! This module contains the fundamental building blocks for SSML parsing:
//! - Cursor: position tracking with memchr-accelerated delimiter scans
//! - Entities: reserved-character escaping with Cow (zero-copy when possible)
//! - Error: the parse/serialization error taxonomy
//! - Parser: recursive-descent grammar rules and tree construction

pub mod cursor;
pub mod entities;
pub mod error;
pub mod parser;
