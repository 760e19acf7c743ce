//! Document arena and browser-state operations.

use tracing::trace;

use crate::error::DomError;
use crate::node::{DomEvent, ElementData, EventKind, Node, NodeId, NodeKind, Selection};
use crate::selector::Selector;

/// Elements whose rendered text starts on a new line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// An in-memory page.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
    selection: Option<Selection>,
    events: Vec<DomEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty page: `#document > html > body`.
    pub fn new() -> Self {
        let mut doc = Self::bare();
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        doc.link(doc.root, html);
        doc.link(html, body);
        doc.body = body;
        doc
    }

    /// A document holding only its root fragment.
    pub(crate) fn bare() -> Self {
        let root = NodeId(0);
        Self {
            nodes: vec![Node::new(NodeKind::Fragment)],
            root,
            body: root,
            focused: None,
            selection: None,
            events: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub(crate) fn set_body(&mut self, body: NodeId) {
        self.body = body;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Tree access
    // ------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::NodeNotFound(id))
    }

    fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        self.node(id)?.element().ok_or(DomError::NotAnElement(id))
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], DomError> {
        Ok(self.node(id)?.children())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    pub fn shadow_root(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.shadow_root)
    }

    /// Host element of a shadow fragment.
    pub fn shadow_host(&self, fragment: NodeId) -> Option<NodeId> {
        self.node(fragment).ok().and_then(|n| n.host)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).ok().and_then(|n| n.tag_name())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|e| e.attribute(name))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_ok_and(|e| e.has_class(class))
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Create a detached element. Tag names are lowercased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let tag = tag.to_ascii_lowercase();
        let value = matches!(tag.as_str(), "input" | "textarea").then(String::new);
        let mut node = Node::new(NodeKind::Element(ElementData {
            tag,
            attributes: Vec::new(),
        }));
        node.value = value;
        self.push(node)
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(Node::new(NodeKind::Text(text.into())))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent)?;
        self.node(child)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }
        self.detach(child)?;
        self.link(parent, child);
        Ok(())
    }

    /// Link two known-valid nodes.
    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, child: NodeId) -> Result<(), DomError> {
        if let Some(old_parent) = self.node(child)?.parent {
            self.node_mut(old_parent)?.children.retain(|c| *c != child);
            self.node_mut(child)?.parent = None;
        }
        Ok(())
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = self.parent(of).or_else(|| self.shadow_host(of));
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent(id).or_else(|| self.shadow_host(id));
        }
        false
    }

    /// Convenience: create an element and append it under `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Convenience: create a text node and append it under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId, DomError> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        let node = self.node_mut(id)?;
        let NodeKind::Element(data) = &mut node.kind else {
            return Err(DomError::NotAnElement(id));
        };
        match data.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => data.attributes.push((name.clone(), value.to_string())),
        }
        if name == "value" && node.value.is_some() && node.tag_name() == Some("input") {
            node.value = Some(value.to_string());
        }
        Ok(())
    }

    /// Attach a shadow fragment to `host`, returning the existing one if present.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        self.element(host)?;
        if let Some(existing) = self.nodes[host.0].shadow_root {
            return Ok(existing);
        }
        let mut fragment = Node::new(NodeKind::Fragment);
        fragment.host = Some(host);
        let id = self.push(fragment);
        self.nodes[host.0].shadow_root = Some(id);
        Ok(id)
    }

    /// Detach all children of `id`.
    pub fn clear_children(&mut self, id: NodeId) -> Result<(), DomError> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of all light-tree descendants.
    pub fn text_content(&self, id: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            if let Some(text) = node.text() {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        Ok(out)
    }

    /// Approximation of the rendered text: `<br>` is a newline and block
    /// elements start on their own line.
    pub fn inner_text(&self, id: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        let mut pending_break = false;
        self.collect_inner_text(id, &mut out, &mut pending_break)?;
        Ok(out)
    }

    fn collect_inner_text(
        &self,
        id: NodeId,
        out: &mut String,
        pending_break: &mut bool,
    ) -> Result<(), DomError> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Text(text) => {
                if *pending_break && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                *pending_break = false;
                out.push_str(text);
            }
            NodeKind::Element(data) if data.tag == "br" => {
                out.push('\n');
                *pending_break = false;
            }
            NodeKind::Element(data) if matches!(data.tag.as_str(), "script" | "style" | "template") => {}
            NodeKind::Element(data) => {
                let block = BLOCK_TAGS.contains(&data.tag.as_str());
                if block {
                    *pending_break = true;
                }
                for child in &node.children {
                    self.collect_inner_text(*child, out, pending_break)?;
                }
                if block {
                    *pending_break = true;
                }
            }
            NodeKind::Fragment => {
                for child in &node.children {
                    self.collect_inner_text(*child, out, pending_break)?;
                }
            }
        }
        Ok(())
    }

    /// Replace the children of `id` with `text`, newlines becoming `<br>`.
    pub fn set_inner_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.element(id)?;
        self.clear_children(id)?;
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                let br = self.create_element("br");
                self.link(id, br);
            }
            if !line.is_empty() {
                let t = self.create_text(line);
                self.link(id, t);
            }
        }
        trace!(node = %id, len = text.len(), "set inner text");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Editing surface
    // ------------------------------------------------------------------

    /// Whether `id` is editable rich content, honouring inheritance from
    /// ancestors and `contenteditable="false"` overrides.
    pub fn is_content_editable(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if let Some(flag) = self.attribute(node_id, "contenteditable") {
                return matches!(
                    flag.trim().to_ascii_lowercase().as_str(),
                    "" | "true" | "plaintext-only"
                );
            }
            current = self.parent(node_id);
        }
        false
    }

    /// Whether `id` is a conventional form field with a value property.
    pub fn is_form_field(&self, id: NodeId) -> bool {
        matches!(self.tag_name(id), Some("input" | "textarea"))
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.node(id).ok().and_then(|n| n.value.as_deref())
    }

    /// Set the live value of a form field.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        if !self.is_form_field(id) {
            return Err(DomError::NotAnElement(id));
        }
        let node = self.node_mut(id)?;
        node.value = Some(value.to_string());
        node.selection_range = None;
        Ok(())
    }

    /// Record an event dispatched at `id`.
    pub fn dispatch_event(&mut self, id: NodeId, kind: EventKind) -> Result<(), DomError> {
        self.element(id)?;
        self.events.push(DomEvent {
            target: id,
            kind,
            bubbles: true,
        });
        Ok(())
    }

    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    /// Move input focus to `id`.
    pub fn focus(&mut self, id: NodeId) -> Result<(), DomError> {
        self.element(id)?;
        if self.focused != Some(id) {
            self.focused = Some(id);
            self.events.push(DomEvent {
                target: id,
                kind: EventKind::Focus,
                bubbles: false,
            });
        }
        Ok(())
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    /// Set the native selection range of a form field, clamped to its value.
    pub fn set_selection_range(&mut self, id: NodeId, start: usize, end: usize) -> Result<(), DomError> {
        if !self.is_form_field(id) {
            return Err(DomError::NotAnElement(id));
        }
        let node = self.node_mut(id)?;
        let len = node.value.as_deref().map_or(0, |v| v.chars().count());
        let end = end.min(len);
        node.selection_range = Some((start.min(end), end));
        Ok(())
    }

    pub fn selection_range(&self, id: NodeId) -> Option<(usize, usize)> {
        self.node(id).ok().and_then(|n| n.selection_range)
    }

    /// Select the contents of `id`, collapse the range to its end and make it
    /// the only active range.
    pub fn collapse_selection_to_end(&mut self, id: NodeId) -> Result<(), DomError> {
        let offset = self.node(id)?.children.len();
        self.selection = Some(Selection {
            container: id,
            offset,
        });
        Ok(())
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First element in document order matching `selector`. The search stays
    /// in the light tree, as `document.querySelector` does.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self.query(&selector))
    }

    /// First element in document order matching a parsed selector.
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.nodes[self.root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Ok(node) = self.node(id) else { continue };
            if node.element().is_some() && selector.matches(self, id) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }
}
