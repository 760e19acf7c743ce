//! Depth-first page walker.

use std::collections::HashSet;

use carryover_config::ExtractorConfig;
use carryover_dom::{Document, NodeId, NodeKind};
use tracing::{debug, trace};

use crate::normalize::{collapse_whitespace, truncate_chars};

/// Tags whose subtree never contributes text.
pub const DEFAULT_SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "path", "button", "input", "textarea",
    "select", "form", "audio", "video", "nav", "header", "footer", "aside",
];

/// Extracts a normalized conversation snapshot from a page subtree.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    skip_tags: HashSet<String>,
    /// Lowercased speaker prefixes.
    speaker_prefixes: Vec<String>,
    max_chars: usize,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl TextExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        let skip_tags = DEFAULT_SKIP_TAGS
            .iter()
            .map(|t| t.to_string())
            .chain(config.extra_skip_tags.iter().map(|t| t.to_ascii_lowercase()))
            .collect();

        Self {
            skip_tags,
            speaker_prefixes: config
                .speaker_prefixes
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            max_chars: config.max_chars,
        }
    }

    /// Override the character budget. `0` disables truncation.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Extract the text of `root` and everything below it, shadow fragments
    /// included. Returns an empty string when nothing readable is found.
    pub fn extract(&self, doc: &Document, root: NodeId) -> String {
        let leaves = self.collect_leaves(doc, root);
        let joined = collapse_whitespace(&leaves.join(" "));
        let text = truncate_chars(joined, self.max_chars);
        debug!(root = %root, leaves = leaves.len(), chars = text.chars().count(), "extracted page text");
        text
    }

    /// Extract the whole page body.
    pub fn extract_body(&self, doc: &Document) -> String {
        self.extract(doc, doc.body())
    }

    /// Whether `text` opens a speaker turn ("You said:", ...).
    pub fn is_speaker_turn(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.speaker_prefixes
            .iter()
            .any(|p| !p.is_empty() && lowered.starts_with(p.as_str()))
    }

    fn collect_leaves(&self, doc: &Document, root: NodeId) -> Vec<String> {
        let mut leaves = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let node = match doc.node(id) {
                Ok(node) => node,
                Err(e) => {
                    debug!("Skipping unreadable node: {}", e);
                    continue;
                }
            };

            match &node.kind {
                NodeKind::Text(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if self.is_speaker_turn(trimmed) {
                        leaves.push(trimmed.to_string());
                    } else {
                        leaves.push(collapse_whitespace(trimmed));
                    }
                }
                NodeKind::Element(data) => {
                    if self.skip_tags.contains(&data.tag) {
                        trace!(node = %id, tag = %data.tag, "pruned");
                        continue;
                    }
                    // Popped after the light children, so visited last.
                    if let Some(shadow) = node.shadow_root() {
                        stack.push(shadow);
                    }
                    stack.extend(node.children().iter().rev());
                }
                NodeKind::Fragment => stack.extend(node.children().iter().rev()),
            }
        }

        leaves
    }
}
