//! Per-tab action router.
//!
//! Each request runs to completion (page work, storage, network) before its
//! single response is built. Failures never escape: they become a failure
//! response carrying the error text.

use std::sync::Arc;

use carryover_config::{Config, RouterConfig};
use carryover_dom::Document;
use carryover_extract::TextExtractor;
use carryover_gateway::{ContextBackend, ScrapeRequest};
use carryover_protocols::{
    keys, ActionRequest, ActionResponse, ContextError, KeyValueStore, SiteId,
};
use carryover_sites::{adapter_for, inject_context};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

/// The page a router operates on. Locks are never held across an await.
pub type SharedPage = Arc<Mutex<Document>>;

/// Dispatches action requests against one page.
pub struct ContentRouter {
    page: SharedPage,
    store: Arc<dyn KeyValueStore>,
    backend: Arc<dyn ContextBackend>,
    extractor: TextExtractor,
    default_word_limit: u32,
}

impl ContentRouter {
    pub fn new(
        page: SharedPage,
        store: Arc<dyn KeyValueStore>,
        backend: Arc<dyn ContextBackend>,
    ) -> Self {
        Self {
            page,
            store,
            backend,
            extractor: TextExtractor::default(),
            default_word_limit: RouterConfig::default().default_word_limit,
        }
    }

    /// Build a router with extractor and router settings from `config`.
    pub fn from_config(
        config: &Config,
        page: SharedPage,
        store: Arc<dyn KeyValueStore>,
        backend: Arc<dyn ContextBackend>,
    ) -> Self {
        Self::new(page, store, backend)
            .with_extractor(TextExtractor::new(&config.extractor))
            .with_default_word_limit(config.router.default_word_limit)
    }

    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_default_word_limit(mut self, word_limit: u32) -> Self {
        self.default_word_limit = word_limit;
        self
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    /// Handle a raw message. Unknown or malformed actions still get a
    /// failure response.
    pub async fn handle_value(&self, message: Value) -> ActionResponse {
        match ActionRequest::from_value(message) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!("Rejected message: {}", e);
                e.into()
            }
        }
    }

    /// Handle one request and produce its single response.
    pub async fn handle(&self, request: ActionRequest) -> ActionResponse {
        let action = request.tag();
        debug!(action, "handling request");

        match self.dispatch(request).await {
            Ok(response) => {
                info!(action, "{}", response.message);
                response
            }
            Err(e) if e.is_lookup() => {
                info!(action, "nothing to do: {}", e);
                e.into()
            }
            Err(e) => {
                warn!(action, "request failed: {}", e);
                e.into()
            }
        }
    }

    async fn dispatch(&self, request: ActionRequest) -> Result<ActionResponse, ContextError> {
        let site = request.target_site();
        match request {
            ActionRequest::Extract { site: tag } => {
                let site = require_site(site, tag.as_deref())?;
                self.extract(site).await
            }
            ActionRequest::Inject { site: tag } => {
                let site = require_site(site, tag.as_deref())?;
                self.inject_saved(site, &[keys::CONVERSATION]).await
            }
            ActionRequest::ExtractConversation { hostname } => {
                let site = require_site(site, hostname.as_deref())?;
                self.extract_and_summarize(site).await
            }
            ActionRequest::InjectContext { hostname } => {
                let site = require_site(site, hostname.as_deref())?;
                self.inject_saved(site, &[keys::USER_CONTEXT, keys::CONVERSATION])
                    .await
            }
            ActionRequest::AddContext {
                hostname,
                url,
                source_tab_id,
                summarize,
                word_limit,
            } => {
                let url = validate_url(url.as_deref())?;
                let site = site.ok_or_else(|| {
                    ContextError::Protocol(format!(
                        "addContext needs the hostname of a supported chat site, got {:?}",
                        hostname.unwrap_or_default()
                    ))
                })?;
                let request = ScrapeRequest::new(url)
                    .with_summarize(summarize.unwrap_or(false))
                    .with_word_limit(word_limit.unwrap_or(self.default_word_limit));
                debug!(source_tab = ?source_tab_id, url = %request.url, "scraping source tab");
                self.add_context(site, request).await
            }
            ActionRequest::SaveContext { text } => self.save_context(&text).await,
        }
    }

    /// Extract the page and keep the raw snapshot.
    async fn extract(&self, site: SiteId) -> Result<ActionResponse, ContextError> {
        let text = self.extract_page()?;
        self.store.set(keys::CONVERSATION, &text).await?;
        Ok(ActionResponse::ok(format!(
            "Extracted {} characters from {}",
            text.chars().count(),
            site.display_name()
        )))
    }

    /// Extract the page, summarize it remotely and keep the summary.
    /// Nothing is stored when summarization fails.
    async fn extract_and_summarize(&self, site: SiteId) -> Result<ActionResponse, ContextError> {
        let text = self.extract_page()?;
        let summary = self.backend.summarize(&text).await?;
        self.store.set(keys::CONVERSATION, &summary).await?;
        Ok(ActionResponse::ok(format!(
            "Saved a summary of the {} conversation",
            site.display_name()
        )))
    }

    /// Inject the first non-blank value stored under `candidates`.
    async fn inject_saved(
        &self,
        site: SiteId,
        candidates: &[&str],
    ) -> Result<ActionResponse, ContextError> {
        let mut context = None;
        for key in candidates {
            if let Some(value) = self.store.get(key).await? {
                if !value.trim().is_empty() {
                    debug!(key, "injecting saved context");
                    context = Some(value);
                    break;
                }
            }
        }
        let context = context
            .ok_or_else(|| ContextError::EmptyResult("no saved context to inject".to_string()))?;
        self.inject(site, &context)
    }

    async fn add_context(
        &self,
        site: SiteId,
        request: ScrapeRequest,
    ) -> Result<ActionResponse, ContextError> {
        let text = self.backend.scrape(&request).await?;
        self.inject(site, &text)
    }

    async fn save_context(&self, text: &str) -> Result<ActionResponse, ContextError> {
        let text = text.trim();
        if text.is_empty() {
            self.store.remove(keys::USER_CONTEXT).await?;
            return Ok(ActionResponse::ok("Context cleared"));
        }
        self.store.set(keys::USER_CONTEXT, text).await?;
        Ok(ActionResponse::ok("Context saved"))
    }

    fn extract_page(&self) -> Result<String, ContextError> {
        let text = {
            let page = self.page.lock();
            self.extractor.extract_body(&page)
        };
        if text.is_empty() {
            return Err(ContextError::EmptyResult(
                "no conversation text on the page".to_string(),
            ));
        }
        Ok(text)
    }

    fn inject(&self, site: SiteId, context: &str) -> Result<ActionResponse, ContextError> {
        let adapter = adapter_for(site);
        let message = {
            let mut page = self.page.lock();
            inject_context(&adapter, &mut page, context)?
        };
        Ok(ActionResponse::injected(
            format!("Injected context into {}", site.display_name()),
            message,
        ))
    }
}

fn require_site(site: Option<SiteId>, given: Option<&str>) -> Result<SiteId, ContextError> {
    site.ok_or_else(|| match given {
        Some(given) if !given.trim().is_empty() => {
            ContextError::Lookup(format!("supported site for {:?}", given))
        }
        _ => ContextError::Lookup("site for this page".to_string()),
    })
}

fn validate_url(url: Option<&str>) -> Result<String, ContextError> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ContextError::Protocol("addContext needs a url".to_string()))?;

    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url.to_string()),
        Ok(parsed) => Err(ContextError::Protocol(format!(
            "cannot scrape {} pages: {}",
            parsed.scheme(),
            url
        ))),
        Err(e) => Err(ContextError::Protocol(format!("invalid url {:?}: {}", url, e))),
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod router_tests;
