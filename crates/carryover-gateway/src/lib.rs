//! # Carryover Gateway
//!
//! Client for the local context service:
//!
//! - `POST /summarize-conversation {raw_conversation}` -> `{summary}`
//! - `POST /scrape {url, summarize, word_limit}` -> `{summary | extracted_text | ...}`
//!
//! Responses are classified into success, server error (5xx), other HTTP
//! error, malformed body, empty result, and unreachable service.

mod backend;
mod client;
mod error;

pub use backend::ContextBackend;
pub use client::{BackendGateway, ScrapeRequest, PAYLOAD_FIELDS};
pub use error::GatewayError;

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
