//! Expand/collapse overlay.
//!
//! The collapse set lives beside the forest rather than inside it, so the
//! same set of ids can be carried across rebuilds and checked against
//! whichever forest is current. Only nodes with children have an expansion
//! state; leaves are ignored by every operation.

use std::collections::HashSet;

use serde::Serialize;

use crate::hierarchy::Forest;

/// Nodes at this level or deeper start collapsed if they have reports.
pub const DEFAULT_COLLAPSE_LEVEL: u32 = 2;

/// Expansion state of a node that has children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Expansion {
    Collapsed,
    Expanded,
}

/// Set of collapsed node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashSet<String>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default policy: collapse every node at level >= 2 that has children.
    ///
    /// Keeps the initial render to three levels regardless of roster size.
    pub fn compute_default(forest: &Forest) -> HashSet<String> {
        forest
            .iter()
            .filter(|(_, node)| node.level >= DEFAULT_COLLAPSE_LEVEL && node.has_children())
            .map(|(_, node)| node.record.id.clone())
            .collect()
    }

    /// Start from the default policy for `forest`.
    pub fn with_default(forest: &Forest) -> Self {
        Self {
            collapsed: Self::compute_default(forest),
        }
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn collapsed(&self) -> &HashSet<String> {
        &self.collapsed
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }

    /// Expansion state of `id`, or `None` for leaves and unknown ids.
    pub fn state_of(&self, forest: &Forest, id: &str) -> Option<Expansion> {
        let node = forest.get(id)?;
        if !node.has_children() {
            return None;
        }
        Some(if self.is_collapsed(id) {
            Expansion::Collapsed
        } else {
            Expansion::Expanded
        })
    }

    /// Flip `id` between collapsed and expanded.
    ///
    /// Returns the new state, or `None` (and changes nothing) for leaves and
    /// ids not in `forest`.
    pub fn toggle(&mut self, forest: &Forest, id: &str) -> Option<Expansion> {
        match self.state_of(forest, id)? {
            Expansion::Collapsed => {
                self.collapsed.remove(id);
                Some(Expansion::Expanded)
            }
            Expansion::Expanded => {
                self.collapsed.insert(id.to_string());
                Some(Expansion::Collapsed)
            }
        }
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Reset to the default policy, computed against `forest` as it is now.
    pub fn collapse_to_default(&mut self, forest: &Forest) {
        self.collapsed = Self::compute_default(forest);
    }

    /// Force the given ids open (used to reveal a search result).
    pub fn expand_path<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            self.collapsed.remove(id);
        }
    }
}
