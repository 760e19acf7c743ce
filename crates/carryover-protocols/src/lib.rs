//! # Carryover Protocols
//!
//! Shared definitions for the Carryover workspace.
//! Contains only types, traits and pure helpers - no I/O.
//!
//! ## Contents
//!
//! - [`SiteId`] - Supported chat sites and hostname resolution
//! - [`ActionRequest`] / [`ActionResponse`] - The message envelope between
//!   the UI shell, the per-tab router and the backend gateway
//! - [`KeyValueStore`] - Persisted state interface
//! - [`ContextError`] - Request-level error taxonomy

pub mod action;
pub mod error;
pub mod site;
pub mod store;

pub use action::{ActionRequest, ActionResponse, DEFAULT_WORD_LIMIT};
pub use error::{ContextError, StoreError};
pub use site::{classify_tab, SiteId, TabKind};
pub use store::{keys, KeyValueStore};
