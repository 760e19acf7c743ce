//! CSS selectors over the page arena.
//!
//! Selectors are parsed with scraper's grammar (no pseudo-classes or
//! pseudo-elements) and matched by the `selectors` engine against
//! [`ElementHandle`], a borrowed view of one arena element. Matching never
//! climbs out of a shadow fragment.

use std::fmt;

use cssparser::ParserInput;
use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, Parser, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{
    self, ElementSelectorFlags, MatchingContext, MatchingForInvalidation, MatchingMode,
    NeedsSelectorFlags, QuirksMode, SelectorCaches,
};
use selectors::parser::{ParseRelative, SelectorImpl, SelectorList};
use selectors::{Element, OpaqueElement};

use crate::document::Document;
use crate::error::DomError;
use crate::node::{ElementData, Node, NodeId};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

type NamespaceUrl = <Simple as SelectorImpl>::NamespaceUrl;

/// A parsed selector group.
#[derive(Debug, Clone)]
pub struct Selector {
    selectors: SelectorList<Simple>,
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self, DomError> {
        let mut input = ParserInput::new(selector);
        let mut parser = cssparser::Parser::new(&mut input);
        SelectorList::parse(&Parser, &mut parser, ParseRelative::No)
            .map(|selectors| Self { selectors })
            .map_err(|e| DomError::InvalidSelector {
                selector: selector.to_string(),
                reason: SelectorErrorKind::from(e).to_string(),
            })
    }

    /// Whether the element `id` matches this selector.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(element) = ElementHandle::new(doc, id) else {
            return false;
        };
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        self.selectors
            .slice()
            .iter()
            .any(|s| matching::matches_selector(s, 0, None, &element, &mut context))
    }
}

/// One element of a [`Document`], as seen by the selector engine.
#[derive(Clone, Copy)]
pub struct ElementHandle<'a> {
    doc: &'a Document,
    id: NodeId,
    node: &'a Node,
    data: &'a ElementData,
}

impl<'a> ElementHandle<'a> {
    /// `None` unless `id` is an element of `doc`.
    pub fn new(doc: &'a Document, id: NodeId) -> Option<Self> {
        let node = doc.node(id).ok()?;
        let data = node.element()?;
        Some(Self { doc, id, node, data })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    fn siblings(&self) -> &'a [NodeId] {
        self.node
            .parent()
            .and_then(|parent| self.doc.children(parent).ok())
            .unwrap_or(&[])
    }

    fn first_element(&self, ids: impl Iterator<Item = &'a NodeId>) -> Option<Self> {
        let doc = self.doc;
        ids.filter_map(|id| ElementHandle::new(doc, *id)).next()
    }
}

impl fmt::Debug for ElementHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}", self.data.tag, self.id)
    }
}

impl Element for ElementHandle<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.node)
    }

    // Shadow fragments are not elements, so this stops at a shadow boundary.
    fn parent_element(&self) -> Option<Self> {
        self.node.parent().and_then(|parent| ElementHandle::new(self.doc, parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        self.node
            .parent()
            .is_some_and(|parent| self.doc.shadow_host(parent).is_some())
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        let mut current = self.node.parent();
        while let Some(id) = current {
            if let Some(host) = self.doc.shadow_host(id) {
                return ElementHandle::new(self.doc, host);
            }
            current = self.doc.parent(id);
        }
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let position = siblings.iter().position(|id| *id == self.id)?;
        self.first_element(siblings[..position].iter().rev())
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let position = siblings.iter().position(|id| *id == self.id)?;
        self.first_element(siblings[position + 1..].iter())
    }

    fn first_element_child(&self) -> Option<Self> {
        self.first_element(self.node.children().iter())
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.data.tag == *name.0
    }

    fn has_namespace(&self, namespace: &NamespaceUrl) -> bool {
        &**namespace == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.tag == other.data.tag
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Arena attributes carry no namespace.
        if let NamespaceConstraint::Specific(url) = ns {
            if !url.is_empty() {
                return false;
            }
        }
        self.data
            .attributes
            .iter()
            .any(|(name, value)| name.eq_ignore_ascii_case(&local_name.0) && operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.data.tag.as_str(), "a" | "area" | "link") && self.data.attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.data.tag == "slot"
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data
            .attribute("id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data.attribute("class").is_some_and(|classes| {
            classes
                .split_ascii_whitespace()
                .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn has_custom_state(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.node.children().iter().all(|child| match self.doc.node(*child) {
            Ok(node) => node.element().is_none() && node.text().is_none_or(str::is_empty),
            Err(_) => true,
        })
    }

    fn is_root(&self) -> bool {
        self.node.parent() == Some(self.doc.root())
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}
