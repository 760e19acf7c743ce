//! Node types.

/// Index of a node inside its [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The document root or a shadow fragment.
    Fragment,
    Element(ElementData),
    Text(String),
}

/// Tag and attributes of an element. Attribute order is preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementData {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }
}

/// A node and its links.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Shadow fragment attached to this element.
    pub(crate) shadow_root: Option<NodeId>,
    /// Host element, set on shadow fragments only.
    pub(crate) host: Option<NodeId>,
    /// Live value of a form field (`input`, `textarea`).
    pub(crate) value: Option<String>,
    /// Native selection range of a form field.
    pub(crate) selection_range: Option<(usize, usize)>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            shadow_root: None,
            host: None,
            value: None,
            selection_range: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn shadow_root(&self) -> Option<NodeId> {
        self.shadow_root
    }

    pub fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.element().map(|e| e.tag.as_str())
    }
}

/// A collapsed document selection (caret).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Node the caret sits in.
    pub container: NodeId,
    /// Child offset inside `container`.
    pub offset: usize,
}

/// Events synthesized at elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Input,
    Change,
    Focus,
}

/// An event dispatched at an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomEvent {
    pub target: NodeId,
    pub kind: EventKind,
    pub bubbles: bool,
}
