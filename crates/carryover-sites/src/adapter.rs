//! Editor adapters.
//!
//! Handles are never cached: callers re-run [`EditorAdapter::locate`] for
//! every operation because the page may re-render its composer at any time.
//! Every operation catches and logs its own failures; an absent handle makes
//! each of them a no-op.

use carryover_dom::{escape_text, Document, DomError, EventKind, NodeId};
use carryover_protocols::SiteId;
use tracing::{debug, warn};

/// Read/write/caret contract over one site's message composer.
pub trait EditorAdapter {
    /// The site this adapter serves.
    fn site(&self) -> SiteId;

    /// Resolve the editor handle. `None` means "not applicable now".
    fn locate(&self, doc: &Document) -> Option<NodeId>;

    /// Current text of the editor, trimmed. Empty for an absent handle.
    fn read_text(&self, doc: &Document, handle: Option<NodeId>) -> String;

    /// Replace the editor text. Returns whether anything was written.
    fn write_text(&self, doc: &mut Document, handle: Option<NodeId>, text: &str) -> bool;

    /// Collapse the selection to the end of the editor and focus it.
    fn place_cursor_at_end(&self, doc: &mut Document, handle: Option<NodeId>);
}

/// The closed set of editor implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteAdapter {
    /// `contenteditable` editors are written through their rendered text,
    /// form fields through their value plus synthesized input events.
    Standard {
        site: SiteId,
        selectors: &'static [&'static str],
    },

    /// A Lexical editor: while empty it keeps a stale placeholder state and
    /// only accepts text wrapped in its own text-node markup.
    Lexical {
        site: SiteId,
        selectors: &'static [&'static str],
    },
}

impl SiteAdapter {
    fn selectors(&self) -> &'static [&'static str] {
        match self {
            SiteAdapter::Standard { selectors, .. } | SiteAdapter::Lexical { selectors, .. } => {
                selectors
            }
        }
    }

    /// Write `text` and report failures instead of swallowing them.
    fn try_write(&self, doc: &mut Document, handle: NodeId, text: &str) -> Result<(), DomError> {
        if let SiteAdapter::Lexical { .. } = self {
            if is_lexical_empty(doc, handle) {
                let markup = format!(r#"<span data-lexical-text="true">{}</span>"#, escape_text(text));
                return doc.set_inner_html(handle, &markup);
            }
        }

        if doc.is_content_editable(handle) {
            doc.set_inner_text(handle, text)
        } else if doc.is_form_field(handle) {
            doc.set_value(handle, text)?;
            doc.dispatch_event(handle, EventKind::Input)?;
            doc.dispatch_event(handle, EventKind::Change)
        } else {
            doc.set_inner_text(handle, text)
        }
    }
}

impl EditorAdapter for SiteAdapter {
    fn site(&self) -> SiteId {
        match self {
            SiteAdapter::Standard { site, .. } | SiteAdapter::Lexical { site, .. } => *site,
        }
    }

    fn locate(&self, doc: &Document) -> Option<NodeId> {
        for selector in self.selectors() {
            match doc.query_selector(selector) {
                Ok(Some(handle)) => {
                    debug!(site = %self.site(), selector, handle = %handle, "editor located");
                    return Some(handle);
                }
                Ok(None) => continue,
                Err(e) => warn!("Failed to get editor for site {}: {}", self.site(), e),
            }
        }
        debug!(site = %self.site(), "no editor on page");
        None
    }

    fn read_text(&self, doc: &Document, handle: Option<NodeId>) -> String {
        let Some(handle) = handle else {
            return String::new();
        };

        if doc.is_form_field(handle) {
            return doc.value(handle).unwrap_or_default().trim().to_string();
        }
        match doc.inner_text(handle) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Failed to get user input: {}", e);
                String::new()
            }
        }
    }

    fn write_text(&self, doc: &mut Document, handle: Option<NodeId>, text: &str) -> bool {
        let Some(handle) = handle else {
            return false;
        };

        match self.try_write(doc, handle, text) {
            Ok(()) => {
                debug!(site = %self.site(), handle = %handle, chars = text.chars().count(), "editor text written");
                true
            }
            Err(e) => {
                warn!("Failed to set text in editor: {}", e);
                false
            }
        }
    }

    fn place_cursor_at_end(&self, doc: &mut Document, handle: Option<NodeId>) {
        let Some(handle) = handle else {
            return;
        };

        let placed = if doc.is_form_field(handle) {
            let len = doc.value(handle).unwrap_or_default().chars().count();
            doc.set_selection_range(handle, len, len)
        } else {
            doc.collapse_selection_to_end(handle)
        };

        if let Err(e) = placed.and_then(|()| doc.focus(handle)) {
            warn!("Failed to place cursor at end: {}", e);
        }
    }
}

/// No text, or nothing but newlines.
fn is_lexical_empty(doc: &Document, handle: NodeId) -> bool {
    match doc.inner_text(handle) {
        Ok(text) => text.trim().is_empty() || text.chars().all(|c| c == '\n'),
        Err(_) => true,
    }
}
