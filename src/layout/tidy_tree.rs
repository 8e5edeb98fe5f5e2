//! Buchheim-Junger-Leipert tidy tree layout for the visible org chart.
//!
//! Implements the linear-time algorithm from "Improving Walker's Algorithm to
//! Run in Linear Time" (Buchheim, Junger, Leipert, 2002). All visible roots
//! hang under a virtual super-root so separate trees sit side by side with
//! subtree spacing between them; the virtual node itself is never output.
//!
//! # Algorithm Overview
//!
//! 1. **First walk (bottom-up):** every node gets a preliminary x relative to
//!    its siblings; sibling subtrees are pushed apart by walking their facing
//!    contours, with threads keeping each contour step O(1).
//! 2. **Second walk (top-down):** accumulated modifiers turn preliminary x
//!    into final x.
//! 3. **Transform:** x is scaled by node width, depth by level separation.
//!
//! Both walks run over an explicit order instead of recursing, because an
//! expanded org chart can be as deep as its (untrusted) manager chains.

use serde::{Deserialize, Serialize};

use crate::error::{OrgChartError, Result};

/// Node geometry and spacing, in layout pixels (before zoom).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Centre-to-centre distance between siblings, in node widths.
    pub sibling_separation: f32,
    /// Centre-to-centre distance between neighbouring subtrees, in node widths.
    pub subtree_separation: f32,
    /// Vertical distance between the tops of consecutive levels.
    pub level_separation: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 88.0,
            sibling_separation: 1.15,
            subtree_separation: 1.4,
            level_separation: 140.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("nodeWidth", self.node_width),
            ("nodeHeight", self.node_height),
            ("siblingSeparation", self.sibling_separation),
            ("subtreeSeparation", self.subtree_separation),
            ("levelSeparation", self.level_separation),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(OrgChartError::InvalidConfig(format!(
                    "layout.{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// A forest to lay out, as plain adjacency over slots `0..len`.
#[derive(Debug, Clone, Copy)]
pub struct TreeShape<'a> {
    /// Top-level slots, left to right.
    pub roots: &'a [usize],
    /// Ordered children of every slot.
    pub children: &'a [Vec<usize>],
    /// Depth of every slot (roots are 0).
    pub depth: &'a [u32],
}

/// Result of the tidy tree layout computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidyTreeResult {
    /// Horizontal centre of each slot.
    pub positions_x: Vec<f32>,
    /// Top edge of each slot.
    pub positions_y: Vec<f32>,
    /// Overall width of the laid-out forest.
    pub width: f32,
    /// Overall height of the laid-out forest.
    pub height: f32,
}

/// Per-node working state for Buchheim's algorithm.
#[derive(Debug, Clone)]
struct Walker {
    parent: Option<usize>,
    children: Vec<usize>,
    /// 1-based position among siblings.
    number: usize,
    prelim: f32,
    modifier: f32,
    /// Midpoint over first/last child, set once the children are placed.
    midpoint: f32,
    thread: Option<usize>,
    ancestor: usize,
    shift: f32,
    change: f32,
}

impl Walker {
    fn new(slot: usize, parent: Option<usize>, number: usize) -> Self {
        Self {
            parent,
            children: Vec::new(),
            number,
            prelim: 0.0,
            modifier: 0.0,
            midpoint: 0.0,
            thread: None,
            ancestor: slot,
            shift: 0.0,
            change: 0.0,
        }
    }
}

/// Index of the virtual super-root in the walker arena.
const SUPER_ROOT: usize = 0;

/// The tidy tree layout engine.
pub struct TidyTreeLayout {
    config: LayoutConfig,
}

impl TidyTreeLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `shape`. Slots not reachable from `shape.roots` stay at (0, 0).
    pub fn compute(&self, shape: TreeShape<'_>) -> TidyTreeResult {
        let len = shape.children.len();
        if len == 0 || shape.roots.is_empty() {
            return TidyTreeResult {
                positions_x: vec![0.0; len],
                positions_y: vec![0.0; len],
                width: 0.0,
                height: 0.0,
            };
        }

        // Arena slot = shape slot + 1; slot 0 is the super-root.
        let mut walkers: Vec<Walker> = (0..=len).map(|slot| Walker::new(slot, None, 0)).collect();
        walkers[SUPER_ROOT].children = shape.roots.iter().map(|&r| r + 1).collect();
        for (number, &root) in shape.roots.iter().enumerate() {
            walkers[root + 1].parent = Some(SUPER_ROOT);
            walkers[root + 1].number = number + 1;
        }
        for (slot, children) in shape.children.iter().enumerate() {
            walkers[slot + 1].children = children.iter().map(|&c| c + 1).collect();
            for (number, &child) in children.iter().enumerate() {
                walkers[child + 1].parent = Some(slot + 1);
                walkers[child + 1].number = number + 1;
            }
        }

        let order = preorder(&walkers);
        self.first_walk(&order, &mut walkers);
        let final_x = second_walk(&order, &walkers);

        let min_x = order
            .iter()
            .skip(1)
            .map(|&v| final_x[v])
            .fold(f32::INFINITY, f32::min);
        let max_x = order
            .iter()
            .skip(1)
            .map(|&v| final_x[v])
            .fold(f32::NEG_INFINITY, f32::max);

        let half_width = self.config.node_width / 2.0;
        let mut positions_x = vec![0.0; len];
        let mut positions_y = vec![0.0; len];
        let mut max_depth = 0;
        for &v in order.iter().skip(1) {
            let slot = v - 1;
            let depth = shape.depth.get(slot).copied().unwrap_or(0);
            max_depth = max_depth.max(depth);
            positions_x[slot] = (final_x[v] - min_x) * self.config.node_width + half_width;
            positions_y[slot] = depth as f32 * self.config.level_separation;
        }

        TidyTreeResult {
            positions_x,
            positions_y,
            width: (max_x - min_x) * self.config.node_width + self.config.node_width,
            height: max_depth as f32 * self.config.level_separation + self.config.node_height,
        }
    }

    /// Desired centre distance between two neighbours on a contour.
    fn distance(&self, left: usize, right: usize, nodes: &[Walker]) -> f32 {
        let parent = nodes[left].parent;
        if parent.is_some() && parent == nodes[right].parent && parent != Some(SUPER_ROOT) {
            self.config.sibling_separation
        } else {
            self.config.subtree_separation
        }
    }

    /// Bottom-up pass. Children are finished before their parent because
    /// `order` is walked in reverse pre-order.
    fn first_walk(&self, order: &[usize], nodes: &mut [Walker]) {
        for &v in order.iter().rev() {
            let children = nodes[v].children.clone();
            let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
                continue;
            };

            let mut default_ancestor = first;
            for (i, &child) in children.iter().enumerate() {
                let left = i.checked_sub(1).map(|j| children[j]);
                self.place(child, left, nodes);
                if let Some(left) = left {
                    default_ancestor = self.apportion(child, left, default_ancestor, nodes);
                }
            }
            execute_shifts(v, nodes);
            nodes[v].midpoint = (nodes[first].prelim + nodes[last].prelim) / 2.0;
        }

        // The super-root has no siblings.
        nodes[SUPER_ROOT].prelim = nodes[SUPER_ROOT].midpoint;
    }

    /// Preliminary x of `v` from its left sibling (or its own children).
    fn place(&self, v: usize, left: Option<usize>, nodes: &mut [Walker]) {
        let is_leaf = nodes[v].children.is_empty();
        match left {
            Some(w) => {
                nodes[v].prelim = nodes[w].prelim + self.distance(w, v, nodes);
                if !is_leaf {
                    nodes[v].modifier = nodes[v].prelim - nodes[v].midpoint;
                }
            }
            None => {
                nodes[v].prelim = if is_leaf { 0.0 } else { nodes[v].midpoint };
            }
        }
    }

    /// Push `v`'s subtree clear of every subtree to its left.
    fn apportion(
        &self,
        v: usize,
        left_sibling: usize,
        mut default_ancestor: usize,
        nodes: &mut [Walker],
    ) -> usize {
        let leftmost = nodes[v]
            .parent
            .and_then(|p| nodes[p].children.first().copied())
            .unwrap_or(v);

        // inner/outer contours on the right (v) and left (siblings) side
        let mut v_in_right = v;
        let mut v_out_right = v;
        let mut v_in_left = left_sibling;
        let mut v_out_left = leftmost;

        let mut s_in_right = nodes[v_in_right].modifier;
        let mut s_out_right = nodes[v_out_right].modifier;
        let mut s_in_left = nodes[v_in_left].modifier;
        let mut s_out_left = nodes[v_out_left].modifier;

        while let (Some(next_in_left), Some(next_in_right)) =
            (next_right(v_in_left, nodes), next_left(v_in_right, nodes))
        {
            v_in_left = next_in_left;
            v_in_right = next_in_right;
            if let Some(next) = next_left(v_out_left, nodes) {
                v_out_left = next;
            }
            if let Some(next) = next_right(v_out_right, nodes) {
                v_out_right = next;
            }
            nodes[v_out_right].ancestor = v;

            let shift = (nodes[v_in_left].prelim + s_in_left)
                - (nodes[v_in_right].prelim + s_in_right)
                + self.distance(v_in_left, v_in_right, nodes);
            if shift > 0.0 {
                let from = ancestor_of(v_in_left, v, default_ancestor, nodes);
                move_subtree(from, v, shift, nodes);
                s_in_right += shift;
                s_out_right += shift;
            }

            s_in_left += nodes[v_in_left].modifier;
            s_in_right += nodes[v_in_right].modifier;
            s_out_left += nodes[v_out_left].modifier;
            s_out_right += nodes[v_out_right].modifier;
        }

        if let Some(next) = next_right(v_in_left, nodes) {
            if next_right(v_out_right, nodes).is_none() {
                nodes[v_out_right].thread = Some(next);
                nodes[v_out_right].modifier += s_in_left - s_out_right;
            }
        }
        if let Some(next) = next_left(v_in_right, nodes) {
            if next_left(v_out_left, nodes).is_none() {
                nodes[v_out_left].thread = Some(next);
                nodes[v_out_left].modifier += s_in_right - s_out_left;
                default_ancestor = v;
            }
        }

        default_ancestor
    }
}

fn next_left(v: usize, nodes: &[Walker]) -> Option<usize> {
    nodes[v].children.first().copied().or(nodes[v].thread)
}

fn next_right(v: usize, nodes: &[Walker]) -> Option<usize> {
    nodes[v].children.last().copied().or(nodes[v].thread)
}

/// The greatest distinct ancestor of `v_in_left` among `v`'s siblings.
fn ancestor_of(v_in_left: usize, v: usize, default_ancestor: usize, nodes: &[Walker]) -> usize {
    let candidate = nodes[v_in_left].ancestor;
    if nodes[candidate].parent == nodes[v].parent {
        candidate
    } else {
        default_ancestor
    }
}

fn move_subtree(left: usize, right: usize, shift: f32, nodes: &mut [Walker]) {
    let subtrees = nodes[right].number.saturating_sub(nodes[left].number).max(1) as f32;
    let per_subtree = shift / subtrees;
    nodes[right].change -= per_subtree;
    nodes[right].shift += shift;
    nodes[left].change += per_subtree;
    nodes[right].prelim += shift;
    nodes[right].modifier += shift;
}

/// Spread the shifts recorded by `move_subtree` over intermediate children.
fn execute_shifts(v: usize, nodes: &mut [Walker]) {
    let mut shift = 0.0f32;
    let mut change = 0.0f32;
    for i in (0..nodes[v].children.len()).rev() {
        let child = nodes[v].children[i];
        nodes[child].prelim += shift;
        nodes[child].modifier += shift;
        change += nodes[child].change;
        shift += nodes[child].shift + change;
    }
}

/// Pre-order from the super-root.
fn preorder(nodes: &[Walker]) -> Vec<usize> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack = vec![SUPER_ROOT];
    while let Some(v) = stack.pop() {
        order.push(v);
        stack.extend(nodes[v].children.iter().rev().copied());
    }
    order
}

/// Top-down pass: final x = prelim + sum of ancestor modifiers.
fn second_walk(order: &[usize], nodes: &[Walker]) -> Vec<f32> {
    let mut final_x = vec![0.0; nodes.len()];
    let mut modifier_sum = vec![0.0f32; nodes.len()];
    for &v in order {
        let above = nodes[v].parent.map(|p| modifier_sum[p]).unwrap_or(0.0);
        final_x[v] = nodes[v].prelim + above;
        modifier_sum[v] = above + nodes[v].modifier;
    }
    final_x
}
