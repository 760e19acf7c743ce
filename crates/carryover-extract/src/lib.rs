//! # Carryover Extract
//!
//! Turns a rendered page subtree into one normalized block of text.
//!
//! The walk is a depth-first pre-order traversal that prunes chrome and
//! controls (scripts, buttons, forms, landmarks...), crosses into shadow
//! fragments, and keeps speaker-turn markers verbatim. It never fails: a
//! node that cannot be read is logged and skipped.

mod extractor;
mod normalize;

pub use extractor::{TextExtractor, DEFAULT_SKIP_TAGS};
pub use normalize::{collapse_whitespace, truncate_chars};
