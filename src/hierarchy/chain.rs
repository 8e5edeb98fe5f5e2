//! Guarded walk up a manager chain.
//!
//! Manager references come from untrusted data, so "follow the manager until
//! there is none" can loop forever. The walk keeps every id it has visited on
//! the current path and stops the moment one would be revisited.

use std::collections::HashSet;
use std::hash::Hash;

/// Result of ascending from a starting node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ascent<T> {
    /// Visited nodes, starting node first, topmost reachable ancestor last.
    pub path: Vec<T>,
    /// The node that would have been visited twice, if the chain loops.
    pub revisited: Option<T>,
}

/// Follow `manager_of` from `start` until it returns `None` or loops.
pub fn ascend<T, F>(start: T, mut manager_of: F) -> Ascent<T>
where
    T: Copy + Eq + Hash,
    F: FnMut(T) -> Option<T>,
{
    let mut on_path = HashSet::new();
    on_path.insert(start);
    let mut path = vec![start];
    let mut current = start;

    while let Some(next) = manager_of(current) {
        if !on_path.insert(next) {
            return Ascent {
                path,
                revisited: Some(next),
            };
        }
        path.push(next);
        current = next;
    }

    Ascent {
        path,
        revisited: None,
    }
}
