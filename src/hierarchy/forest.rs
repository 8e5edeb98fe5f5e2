//! The built org chart forest.
//!
//! Nodes live in an arena in roster order and refer to each other by
//! [`NodeIdx`]. A forest is produced whole by the builder and never edited
//! afterwards; a roster or filter change builds a new one.

use std::collections::HashMap;
use std::fmt;

use crate::directory::EmployeeRecord;

/// Arena slot of a node within one forest.
///
/// Only meaningful for the forest that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    #[inline]
    pub fn new(slot: usize) -> Self {
        Self(slot as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeIdx {
    #[inline]
    fn from(slot: u32) -> Self {
        Self(slot)
    }
}

/// One employee placed in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgNode {
    pub record: EmployeeRecord,
    /// Depth below the root of this node's tree (roots are 0).
    pub level: u32,
    pub parent: Option<NodeIdx>,
    /// Direct reports in sibling order.
    pub children: Vec<NodeIdx>,
}

impl OrgNode {
    #[inline]
    pub fn id(&self) -> &str {
        &self.record.id
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A rooted forest of org nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    nodes: Vec<OrgNode>,
    roots: Vec<NodeIdx>,
    index: HashMap<String, NodeIdx>,
}

impl Forest {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(nodes: Vec<OrgNode>, roots: Vec<NodeIdx>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.record.id.clone(), NodeIdx::new(slot)))
            .collect();
        Self {
            nodes,
            roots,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes in sibling order.
    pub fn roots(&self) -> &[NodeIdx] {
        &self.roots
    }

    pub fn node(&self, idx: NodeIdx) -> &OrgNode {
        &self.nodes[idx.index()]
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIdx> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&OrgNode> {
        self.index_of(id).map(|idx| self.node(idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn parent(&self, idx: NodeIdx) -> Option<&OrgNode> {
        self.node(idx).parent.map(|parent| self.node(parent))
    }

    /// All nodes in arena (roster) order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &OrgNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (NodeIdx::new(slot), node))
    }

    /// Depth-first pre-order over the whole forest, following sibling order.
    ///
    /// `descend` decides whether a node's children are visited; the node
    /// itself is always yielded.
    pub fn preorder_where<F>(&self, mut descend: F) -> Vec<NodeIdx>
    where
        F: FnMut(NodeIdx, &OrgNode) -> bool,
    {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeIdx> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            order.push(idx);
            let node = self.node(idx);
            if descend(idx, node) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    pub fn preorder(&self) -> Vec<NodeIdx> {
        self.preorder_where(|_, _| true)
    }
}
