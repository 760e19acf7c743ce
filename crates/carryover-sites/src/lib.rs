//! # Carryover Sites
//!
//! Normalizes the message composer of each supported chat site into one
//! contract: locate the editor, read its text, write replacement text,
//! put the caret at the end.
//!
//! ## Adapters
//!
//! - [`SiteAdapter::Standard`] - plain `contenteditable` editors and form fields
//! - [`SiteAdapter::Lexical`] - editors that need structural markup while empty
//!
//! [`inject_context`] ties an adapter to the [`compose`]r.

mod adapter;
mod composer;
mod inject;
mod registry;

pub use adapter::{EditorAdapter, SiteAdapter};
pub use composer::{compose, CONTEXT_PREFIX};
pub use inject::inject_context;
pub use registry::{adapter_for, editor_selectors};
