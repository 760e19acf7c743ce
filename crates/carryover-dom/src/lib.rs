//! Page model for Carryover.
//!
//! A [`Document`] is an arena of element and text nodes standing in for a
//! live browser page. Besides the tree itself it carries the bits of browser
//! state the context injector touches: shadow fragments, form-field values,
//! the editable flag, the active selection, input focus and the events
//! dispatched at elements.
//!
//! Pages are usually built from saved HTML with [`Document::parse_html`];
//! declarative shadow roots (`<template shadowrootmode="open">`) become
//! shadow fragments of their host.

mod document;
mod error;
mod html;
mod node;
mod selector;

pub use document::Document;
pub use error::DomError;
pub use html::escape_text;
pub use node::{DomEvent, EventKind, Node, NodeId, NodeKind, Selection};
pub use selector::{ElementHandle, Selector};

#[cfg(test)]
#[path = "document_tests.rs"]
mod document_tests;

#[cfg(test)]
#[path = "html_tests.rs"]
mod html_tests;
