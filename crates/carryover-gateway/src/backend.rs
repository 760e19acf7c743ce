//! Backend seam used by the router.

use async_trait::async_trait;
use carryover_protocols::ContextError;

use crate::client::ScrapeRequest;

/// Remote summarization and scraping.
#[async_trait]
pub trait ContextBackend: Send + Sync {
    /// Summarize raw conversation text. Never returns an empty summary.
    async fn summarize(&self, raw_conversation: &str) -> Result<String, ContextError>;

    /// Fetch a page and return its text, optionally summarized.
    /// Never returns empty text.
    async fn scrape(&self, request: &ScrapeRequest) -> Result<String, ContextError>;
}
