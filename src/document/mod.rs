//! The rich-document tree edited on the live surface and read by export.
//!
//! A [`RichDocument`] is an ordered list of top-level nodes, each tagged with a
//! stable [`NodeId`]. Ids survive insertions and removals, so measured boxes
//! from a rendered frame can still be matched to their nodes after the tree
//! changed underneath.

pub mod node;

pub use node::{Alignment, BreakKind, Element, ImageNode, Node, TextFormat, TextNode};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a top-level node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Ordered sequence of top-level nodes.
///
/// # Examples
///
/// ```rust
/// use folio::document::{BreakKind, Node, RichDocument};
///
/// let mut doc = RichDocument::new();
/// let first = doc.push(Node::paragraph(vec![Node::text("one")]));
/// let second = doc.push(Node::paragraph(vec![Node::text("two")]));
///
/// let marker = doc.insert_break_before(second, BreakKind::Auto).unwrap();
/// assert_eq!(doc.ids().collect::<Vec<_>>(), vec![first, marker, second]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SerializedDocument", into = "SerializedDocument")]
pub struct RichDocument {
    entries: Vec<(NodeId, Node)>,
    next_id: u64,
}

/// On-disk shape: `{"children": [...]}`. Ids are reassigned on load.
#[derive(Serialize, Deserialize)]
struct SerializedDocument {
    #[serde(default)]
    children: Vec<Node>,
}

impl From<SerializedDocument> for RichDocument {
    fn from(doc: SerializedDocument) -> Self {
        Self::from_nodes(doc.children)
    }
}

impl From<RichDocument> for SerializedDocument {
    fn from(doc: RichDocument) -> Self {
        Self {
            children: doc.entries.into_iter().map(|(_, node)| node).collect(),
        }
    }
}

impl RichDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut doc = Self::new();
        for node in nodes {
            doc.push(node);
        }
        doc
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a top-level node.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = self.allocate_id();
        self.entries.push((id, node));
        id
    }

    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.entries.iter().position(|(entry_id, _)| *entry_id == id)
    }

    /// Insert `node` immediately before the node with id `before`.
    pub fn insert_before(&mut self, before: NodeId, node: Node) -> Option<NodeId> {
        let index = self.position(before)?;
        let id = self.allocate_id();
        self.entries.insert(index, (id, node));
        Some(id)
    }

    /// Insert a page break marker immediately before `before`.
    pub fn insert_break_before(&mut self, before: NodeId, kind: BreakKind) -> Option<NodeId> {
        self.insert_before(before, Node::page_break(kind))
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let index = self.position(id)?;
        Some(self.entries.remove(index).1)
    }

    /// Remove every automatically inserted break marker, returning how many
    /// were dropped.
    pub fn clear_auto_breaks(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, node)| {
            !matches!(
                node,
                Node::PageBreak {
                    kind: BreakKind::Auto
                }
            )
        });
        before - self.entries.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, node)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.entries.iter().map(|(id, node)| (*id, node))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter().map(|(_, node)| node)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn break_count(&self) -> usize {
        self.nodes().filter(|node| node.is_break_marker()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable() {
        let mut doc = RichDocument::new();
        let a = doc.push(Node::paragraph(vec![Node::text("a")]));
        let b = doc.push(Node::paragraph(vec![Node::text("b")]));

        let marker = doc.insert_break_before(b, BreakKind::Auto).unwrap();
        assert_eq!(doc.position(a), Some(0));
        assert_eq!(doc.position(marker), Some(1));
        assert_eq!(doc.position(b), Some(2));
        assert_eq!(doc.get(b).unwrap().text_content(), "b");

        assert!(doc.remove(a).is_some());
        assert_eq!(doc.position(b), Some(1));
        assert!(doc.insert_before(a, Node::LineBreak).is_none());
    }

    #[test]
    fn test_clear_auto_breaks() {
        let mut doc = RichDocument::new();
        let a = doc.push(Node::paragraph(vec![]));
        doc.push(Node::page_break(BreakKind::Manual));
        doc.insert_break_before(a, BreakKind::Auto);
        assert_eq!(doc.break_count(), 2);

        assert_eq!(doc.clear_auto_breaks(), 1);
        assert_eq!(doc.break_count(), 1);
    }

    #[test]
    fn test_json_fixture() {
        let json = r#"{
            "children": [
                {"type": "heading", "level": 1, "children": [{"type": "text", "text": "Title"}]},
                {"type": "paragraph", "align": "center", "style": "line-height: 2",
                 "children": [{"type": "text", "text": "Body", "format": 1}]},
                {"type": "page-break", "kind": "manual"}
            ]
        }"#;
        let doc: RichDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.break_count(), 1);

        let para = doc.nodes().nth(1).unwrap();
        let element = para.element().unwrap();
        assert_eq!(element.align, Alignment::Center);
        assert_eq!(element.style, "line-height: 2");

        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["children"].as_array().unwrap().len(), 3);
    }
}
