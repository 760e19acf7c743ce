//! Action request/response envelope.
//!
//! Requests are correlated with responses structurally: every request gets
//! exactly one response, there are no message IDs.

use serde::{Deserialize, Serialize};

use crate::error::ContextError;
use crate::site::SiteId;

/// Word limit applied to scrape summaries when the request does not carry one.
pub const DEFAULT_WORD_LIMIT: u32 = 200;

/// An action sent to the per-tab router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ActionRequest {
    /// Extract the page conversation and persist it locally.
    Extract {
        #[serde(default)]
        site: Option<String>,
    },

    /// Inject the persisted conversation into the page editor.
    Inject {
        #[serde(default)]
        site: Option<String>,
    },

    /// Extract the page conversation, summarize it remotely, persist the summary.
    ExtractConversation {
        #[serde(default)]
        hostname: Option<String>,
    },

    /// Inject the persisted user context into the page editor.
    InjectContext {
        #[serde(default)]
        hostname: Option<String>,
    },

    /// Scrape another page and inject its text into the page editor.
    AddContext {
        #[serde(default)]
        hostname: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default, rename = "sourceTabId")]
        source_tab_id: Option<u64>,
        #[serde(default)]
        summarize: Option<bool>,
        #[serde(default)]
        word_limit: Option<u32>,
    },

    /// Store the free-text user context.
    SaveContext { text: String },
}

impl ActionRequest {
    /// The wire tag of this request.
    pub fn tag(&self) -> &'static str {
        match self {
            ActionRequest::Extract { .. } => "extract",
            ActionRequest::Inject { .. } => "inject",
            ActionRequest::ExtractConversation { .. } => "extractConversation",
            ActionRequest::InjectContext { .. } => "injectContext",
            ActionRequest::AddContext { .. } => "addContext",
            ActionRequest::SaveContext { .. } => "saveContext",
        }
    }

    /// The site this request targets, resolved from its `site` tag or
    /// `hostname`. `None` means "no site": the request is a no-op.
    pub fn target_site(&self) -> Option<SiteId> {
        match self {
            ActionRequest::Extract { site } | ActionRequest::Inject { site } => {
                site.as_deref().and_then(SiteId::from_tag)
            }
            ActionRequest::ExtractConversation { hostname }
            | ActionRequest::InjectContext { hostname }
            | ActionRequest::AddContext { hostname, .. } => {
                hostname.as_deref().and_then(SiteId::from_hostname)
            }
            ActionRequest::SaveContext { .. } => None,
        }
    }

    /// Parse a request from a raw JSON message.
    ///
    /// Unknown tags and missing required fields are protocol failures.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ContextError> {
        serde_json::from_value(value)
            .map_err(|e| ContextError::Protocol(format!("Unsupported or malformed action: {}", e)))
    }
}

/// The single response produced for an [`ActionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injected: Option<String>,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            injected: None,
        }
    }

    pub fn injected(message: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            injected: Some(text.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            injected: None,
        }
    }
}

impl From<ContextError> for ActionResponse {
    fn from(err: ContextError) -> Self {
        ActionResponse::failure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_extract() {
        let req = ActionRequest::from_value(json!({"action": "extract", "site": "chatgpt"})).unwrap();
        assert_eq!(req, ActionRequest::Extract { site: Some("chatgpt".to_string()) });
        assert_eq!(req.target_site(), Some(SiteId::ChatGpt));
    }

    #[test]
    fn test_parse_add_context() {
        let req = ActionRequest::from_value(json!({
            "action": "addContext",
            "hostname": "claude.ai",
            "url": "https://example.com/article",
            "sourceTabId": 42,
            "summarize": true,
            "word_limit": 150
        }))
        .unwrap();

        match &req {
            ActionRequest::AddContext { url, source_tab_id, summarize, word_limit, .. } => {
                assert_eq!(url.as_deref(), Some("https://example.com/article"));
                assert_eq!(*source_tab_id, Some(42));
                assert_eq!(*summarize, Some(true));
                assert_eq!(*word_limit, Some(150));
            }
            other => panic!("unexpected request: {:?}", other),
        }
        assert_eq!(req.tag(), "addContext");
        assert_eq!(req.target_site(), Some(SiteId::Claude));
    }

    #[test]
    fn test_optional_fields_default() {
        let req = ActionRequest::from_value(json!({"action": "addContext"})).unwrap();
        assert_eq!(
            req,
            ActionRequest::AddContext {
                hostname: None,
                url: None,
                source_tab_id: None,
                summarize: None,
                word_limit: None,
            }
        );
        assert_eq!(req.target_site(), None);
    }

    #[test]
    fn test_unknown_tag_is_protocol_error() {
        let err = ActionRequest::from_value(json!({"action": "teleport"})).unwrap_err();
        assert!(matches!(err, ContextError::Protocol(_)));
        assert!(err.to_string().contains("Unsupported or malformed"));
    }

    #[test]
    fn test_missing_tag_is_protocol_error() {
        let err = ActionRequest::from_value(json!({"site": "chatgpt"})).unwrap_err();
        assert!(matches!(err, ContextError::Protocol(_)));
    }

    #[test]
    fn test_unknown_site_tag_is_no_site() {
        let req = ActionRequest::Inject { site: Some("bard".to_string()) };
        assert_eq!(req.target_site(), None);
    }

    #[test]
    fn test_request_serializes_wire_tags() {
        let req = ActionRequest::InjectContext { hostname: Some("chatgpt.com".to_string()) };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["action"], "injectContext");
        assert_eq!(value["hostname"], "chatgpt.com");
    }

    #[test]
    fn test_response_omits_missing_injected() {
        let value = serde_json::to_value(ActionResponse::ok("done")).unwrap();
        assert_eq!(value, json!({"success": true, "message": "done"}));

        let value = serde_json::to_value(ActionResponse::injected("ok", "text")).unwrap();
        assert_eq!(value["injected"], "text");
    }

    #[test]
    fn test_response_from_error() {
        let resp = ActionResponse::from(ContextError::EmptyResult("scrape".to_string()));
        assert!(!resp.success);
        assert!(resp.message.contains("scrape"));
        assert!(resp.injected.is_none());
    }
}
