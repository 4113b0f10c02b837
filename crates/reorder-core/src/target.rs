#![forbid(unsafe_code)]

//! Event targets.
//!
//! A host adapter describes where an input event landed as an
//! [`EventTarget`]: the chain of nodes from the innermost hit node outwards.
//! The engine walks that chain the way a DOM `closest()` lookup would, to find
//! the sortable item, a drag handle, or an editable region, without ever
//! holding a reference into the host's node tree.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque identity of a host element.
///
/// The host chooses the values; the engine only compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse classification of a node, enough for drag eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Any node with no special meaning.
    #[default]
    Generic,
    Anchor,
    Button,
    Canvas,
    Input,
    Option,
    Select,
    Textarea,
}

impl NodeKind {
    /// Form controls that keep their own pointer and key handling; pressing
    /// them must not start a drag.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(
            self,
            Self::Input | Self::Textarea | Self::Select | Self::Option | Self::Button
        )
    }
}

/// One node on an event path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    pub element: ElementId,
    pub kind: NodeKind,
    /// The node itself is `contenteditable`.
    pub editable: bool,
    /// The node is a designated drag handle.
    pub handle: bool,
}

impl NodeInfo {
    #[must_use]
    pub const fn new(element: ElementId) -> Self {
        Self {
            element,
            kind: NodeKind::Generic,
            editable: false,
            handle: false,
        }
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub const fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    #[must_use]
    pub const fn handle(mut self) -> Self {
        self.handle = true;
        self
    }
}

/// The node path of an input event, innermost node first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventTarget {
    path: Vec<NodeInfo>,
}

impl EventTarget {
    /// Build from an innermost-first path.
    #[must_use]
    pub fn new(path: Vec<NodeInfo>) -> Self {
        Self { path }
    }

    /// A target that is a single plain element.
    #[must_use]
    pub fn element(element: ElementId) -> Self {
        Self::new(vec![NodeInfo::new(element)])
    }

    /// Prepend a deeper node (the new innermost target).
    #[must_use]
    pub fn within(mut self, node: NodeInfo) -> Self {
        self.path.insert(0, node);
        self
    }

    /// The innermost node, if any.
    #[must_use]
    pub fn node(&self) -> Option<&NodeInfo> {
        self.path.first()
    }

    #[must_use]
    pub fn path(&self) -> &[NodeInfo] {
        &self.path
    }

    /// First node (innermost outwards) matching `pred`.
    pub fn closest(&self, mut pred: impl FnMut(&NodeInfo) -> bool) -> Option<&NodeInfo> {
        self.path.iter().find(|node| pred(node))
    }

    /// Nodes from the innermost target up to and including `element`.
    ///
    /// Returns the whole path when `element` is not on it.
    #[must_use]
    pub fn up_to(&self, element: ElementId) -> &[NodeInfo] {
        match self.path.iter().position(|node| node.element == element) {
            Some(i) => &self.path[..=i],
            None => &self.path,
        }
    }

    /// Whether the target is inside an editable region.
    #[must_use]
    pub fn in_editable(&self) -> bool {
        self.closest(|node| node.editable).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> EventTarget {
        EventTarget::element(ElementId(1))
            .within(NodeInfo::new(ElementId(2)).handle())
            .within(NodeInfo::new(ElementId(3)).with_kind(NodeKind::Canvas))
    }

    #[test]
    fn within_prepends_innermost() {
        let target = path();
        assert_eq!(target.node().map(|n| n.element), Some(ElementId(3)));
        assert_eq!(target.path().len(), 3);
    }

    #[test]
    fn closest_walks_outwards() {
        let target = path();
        let handle = target.closest(|n| n.handle);
        assert_eq!(handle.map(|n| n.element), Some(ElementId(2)));
        assert!(target.closest(|n| n.editable).is_none());
    }

    #[test]
    fn up_to_stops_at_element() {
        let target = path();
        assert_eq!(target.up_to(ElementId(2)).len(), 2);
        assert_eq!(target.up_to(ElementId(99)).len(), 3);
    }

    #[test]
    fn interactive_kinds() {
        assert!(NodeKind::Input.is_interactive());
        assert!(NodeKind::Button.is_interactive());
        assert!(!NodeKind::Anchor.is_interactive());
        assert!(!NodeKind::Canvas.is_interactive());
    }
}
