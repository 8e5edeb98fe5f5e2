//! R-tree over node cards using the rstar crate.
//!
//! Cards are axis-aligned rectangles in layout coordinates (before zoom).
//! Tidy layout never overlaps cards, so a point hits at most one of them.

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use crate::hierarchy::NodeIdx;

/// A laid-out card: node plus its rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeCard {
    pub node: NodeIdx,
    bounds: AABB<[f32; 2]>,
}

impl NodeCard {
    /// Card whose top edge is centred on `(centre_x, top)`.
    pub fn new(node: NodeIdx, centre_x: f32, top: f32, width: f32, height: f32) -> Self {
        let half = width / 2.0;
        Self {
            node,
            bounds: AABB::from_corners([centre_x - half, top], [centre_x + half, top + height]),
        }
    }
}

impl RTreeObject for NodeCard {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for NodeCard {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        self.bounds.distance_2(point)
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        self.bounds.contains_point(point)
    }
}

/// Hit-test index over the visible cards.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<NodeCard>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load the index from the current frame's cards.
    pub fn from_cards(cards: Vec<NodeCard>) -> Self {
        Self {
            tree: RTree::bulk_load(cards),
        }
    }

    /// Card under `(x, y)` in layout coordinates, if any.
    pub fn node_at(&self, x: f32, y: f32) -> Option<NodeIdx> {
        self.tree.locate_at_point(&[x, y]).map(|card| card.node)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
