//! Site to adapter mapping.

use carryover_protocols::SiteId;

use crate::adapter::SiteAdapter;

/// Selector strategy of each site, tried in order.
pub fn editor_selectors(site: SiteId) -> &'static [&'static str] {
    match site {
        SiteId::ChatGpt => &["#prompt-textarea"],
        SiteId::Claude => &[r#"div[contenteditable="true"][data-testid="chat-input"]"#],
        SiteId::Gemini => &[r#".ql-editor[contenteditable="true"]"#],
        SiteId::Perplexity => &["#ask-input p span", "#ask-input p"],
    }
}

/// The adapter for `site`.
pub fn adapter_for(site: SiteId) -> SiteAdapter {
    let selectors = editor_selectors(site);
    match site {
        SiteId::Perplexity => SiteAdapter::Lexical { site, selectors },
        _ => SiteAdapter::Standard { site, selectors },
    }
}
