//! Page model errors.

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Error)]
pub enum DomError {
    /// The id does not address a node of this document.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The operation needs an element.
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    /// Appending would make a node its own ancestor.
    #[error("Cannot append node {child} under {parent}: would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}
