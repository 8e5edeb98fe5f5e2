//! Cycle diagnostics for corrupt manager data.
//!
//! The builder already breaks cycles while walking; this only names the
//! employees involved so the host can tell an operator which records to fix.

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Directed;

/// Groups of roster slots whose manager references form a cycle.
///
/// `managers[i]` is the resolved manager slot of slot `i`. Each group is
/// sorted by slot; groups are ordered by their first slot.
pub(crate) fn cycle_groups(managers: &[Option<usize>]) -> Vec<Vec<usize>> {
    let mut graph: StableGraph<usize, (), Directed> =
        StableGraph::with_capacity(managers.len(), managers.len());
    let indices: Vec<NodeIndex> = (0..managers.len())
        .map(|slot| graph.add_node(slot))
        .collect();

    for (slot, manager) in managers.iter().enumerate() {
        if let Some(&manager) = manager.as_ref() {
            graph.add_edge(indices[slot], indices[manager], ());
        }
    }

    let mut groups: Vec<Vec<usize>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => managers[graph[*single]] == Some(graph[*single]),
            _ => true,
        })
        .map(|component| {
            let mut slots: Vec<usize> = component.into_iter().map(|ix| graph[ix]).collect();
            slots.sort_unstable();
            slots
        })
        .collect();

    groups.sort_unstable_by_key(|group| group[0]);
    groups
}
