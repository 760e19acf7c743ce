//! Supported chat sites and hostname resolution.

use serde::{Deserialize, Serialize};

/// Enumerated tag for a supported chat site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteId {
    ChatGpt,
    Claude,
    Gemini,
    Perplexity,
}

/// Static domain table. Hostnames are matched by substring containment so
/// subdomains resolve to their parent entry.
const SITE_DOMAINS: &[(SiteId, &[&str])] = &[
    (SiteId::ChatGpt, &["chatgpt.com", "chat.openai.com"]),
    (SiteId::Claude, &["claude.ai"]),
    (SiteId::Gemini, &["gemini.google.com", "ai.google.com"]),
    (SiteId::Perplexity, &["perplexity.ai"]),
];

/// URL schemes of browser-internal pages that are never offered as tabs.
const INTERNAL_SCHEMES: &[&str] = &["chrome:", "chrome-extension:", "extension:", "about:"];

impl SiteId {
    /// All supported sites, in table order.
    pub fn all() -> impl Iterator<Item = SiteId> {
        SITE_DOMAINS.iter().map(|(site, _)| *site)
    }

    /// Short tag used in action requests (`"chatgpt"`, `"claude"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteId::ChatGpt => "chatgpt",
            SiteId::Claude => "claude",
            SiteId::Gemini => "gemini",
            SiteId::Perplexity => "perplexity",
        }
    }

    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            SiteId::ChatGpt => "ChatGPT",
            SiteId::Claude => "Claude",
            SiteId::Gemini => "Gemini",
            SiteId::Perplexity => "Perplexity",
        }
    }

    /// Domains that map to this site.
    pub fn domains(&self) -> &'static [&'static str] {
        SITE_DOMAINS
            .iter()
            .find(|(site, _)| site == self)
            .map(|(_, domains)| *domains)
            .unwrap_or(&[])
    }

    /// Parse a short tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<SiteId> {
        let tag = tag.trim();
        Self::all().find(|site| site.as_str().eq_ignore_ascii_case(tag))
    }

    /// Resolve a hostname against the domain table.
    ///
    /// When several domains are contained in the hostname the longest one wins.
    pub fn from_hostname(hostname: &str) -> Option<SiteId> {
        let hostname = hostname.trim().to_ascii_lowercase();
        if hostname.is_empty() {
            return None;
        }

        SITE_DOMAINS
            .iter()
            .flat_map(|(site, domains)| domains.iter().map(move |d| (*site, *d)))
            .filter(|(_, domain)| hostname.contains(domain))
            .max_by_key(|(_, domain)| domain.len())
            .map(|(site, _)| site)
    }

    /// Resolve a full URL. Strings that do not parse as URLs are matched as-is.
    pub fn from_url(raw: &str) -> Option<SiteId> {
        Self::from_hostname(&host_of(raw))
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a browser tab participates in context transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    /// A supported chat site: context can be extracted from and injected into it.
    ChatSite(SiteId),
    /// Any other web page: usable as an `addContext` scrape source.
    Other,
}

/// Classify a tab by its URL. Browser-internal pages yield `None`.
pub fn classify_tab(url: &str) -> Option<TabKind> {
    let url = url.trim();
    if url.is_empty() || INTERNAL_SCHEMES.iter().any(|s| url.starts_with(s)) {
        return None;
    }

    Some(match SiteId::from_url(url) {
        Some(site) => TabKind::ChatSite(site),
        None => TabKind::Other,
    })
}

fn host_of(raw: &str) -> String {
    match url::Url::parse(raw.trim()) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().to_string(),
        Err(_) => raw.trim().to_string(),
    }
}

#[cfg(test)]
#[path = "site_tests.rs"]
mod tests;
