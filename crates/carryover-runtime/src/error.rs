//! Dispatch errors.

use std::time::Duration;

use carryover_protocols::ActionResponse;
use thiserror::Error;

use crate::tab::TabId;

/// Failure to get a response out of a tab.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Nothing is listening in the tab yet. Retry after bootstrapping.
    #[error("No listener in tab {0}")]
    NoListener(TabId),

    /// The listener went away before answering (e.g. the tab navigated).
    #[error("Tab {0} closed the response channel")]
    ChannelClosed(TabId),

    #[error("Tab {tab} did not respond within {timeout:?}")]
    Timeout { tab: TabId, timeout: Duration },

    #[error("Unknown tab {0}")]
    UnknownTab(TabId),

    #[error("Could not encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl DispatchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatchError::NoListener(_))
    }
}

impl From<DispatchError> for ActionResponse {
    fn from(err: DispatchError) -> Self {
        ActionResponse::failure(err.to_string())
    }
}
