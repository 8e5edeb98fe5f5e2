//! Flat roster to forest.
//!
//! # Algorithm
//!
//! 1. **Index:** one slot per record, keyed by id (first occurrence wins).
//! 2. **Link:** each record's `manager_id` is resolved by map lookup; resolved
//!    records are appended to their manager's report list, the rest are roots.
//! 3. **Order:** every report list, and the root list, is stable-sorted into
//!    sibling order.
//! 4. **Walk:** an iterative DFS from each root assigns levels. The ids on
//!    the active path are tracked; an edge leading back onto the path is cut.
//!    Records never reached from a root sit in a manager cycle: one member of
//!    each cycle is promoted to a root and walked the same way.
//!
//! Every step is linear in the roster size and none of them recurse, so
//! arbitrarily deep or corrupt rosters are safe.

use std::collections::HashMap;

use serde::Serialize;

use super::chain::ascend;
use super::cycles::cycle_groups;
use super::forest::{Forest, NodeIdx, OrgNode};
use super::ordering::{sort_slots, SiblingKey};
use crate::directory::EmployeeRecord;

/// A manager edge removed to break a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CutEdge {
    pub manager_id: String,
    pub employee_id: String,
}

/// What the builder had to repair while building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub node_count: usize,
    pub root_count: usize,
    /// Ids that appeared more than once; only the first record was kept.
    pub duplicate_ids: Vec<String>,
    /// Cycle members promoted to roots.
    pub promoted_roots: Vec<String>,
    pub cut_edges: Vec<CutEdge>,
    /// Employees whose manager references form each cycle, in roster order.
    pub cycles: Vec<Vec<String>>,
}

impl BuildReport {
    pub fn has_repairs(&self) -> bool {
        !self.duplicate_ids.is_empty() || !self.cut_edges.is_empty()
    }
}

/// Build the org chart forest from a flat roster.
///
/// Never fails: empty input gives an empty forest, dangling managers make
/// roots, and cycles are cut (see module docs).
pub fn build(records: &[EmployeeRecord]) -> (Forest, BuildReport) {
    let mut report = BuildReport::default();

    // Index
    let mut slot_of: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut kept: Vec<&EmployeeRecord> = Vec::with_capacity(records.len());
    for record in records {
        if slot_of.contains_key(record.id.as_str()) {
            tracing::warn!(employee = %record.id, "duplicate employee id dropped");
            report.duplicate_ids.push(record.id.clone());
            continue;
        }
        slot_of.insert(record.id.as_str(), kept.len());
        kept.push(record);
    }
    let n = kept.len();

    // Link
    let managers: Vec<Option<usize>> = kept
        .iter()
        .map(|record| {
            record
                .manager_id
                .as_deref()
                .and_then(|manager| slot_of.get(manager).copied())
        })
        .collect();

    let mut reports: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut roots: Vec<usize> = Vec::new();
    for (slot, manager) in managers.iter().enumerate() {
        match *manager {
            Some(manager) => reports[manager].push(slot),
            None => roots.push(slot),
        }
    }

    // Order
    let keys: Vec<SiblingKey> = kept.iter().map(|record| SiblingKey::of(record)).collect();
    for list in &mut reports {
        sort_slots(list, &keys);
    }
    sort_slots(&mut roots, &keys);

    // Walk
    let mut walk = Walk::new(&reports);
    for &root in &roots {
        walk.attach(root);
    }

    for slot in 0..n {
        if walk.visited[slot] {
            continue;
        }
        let ascent = ascend(slot, |s| managers[s]);
        let promoted = ascent
            .revisited
            .or_else(|| ascent.path.last().copied())
            .unwrap_or(slot);
        tracing::warn!(
            employee = %kept[promoted].id,
            "manager cycle detected; promoting employee to root"
        );
        report.promoted_roots.push(kept[promoted].id.clone());
        roots.push(promoted);
        walk.attach(promoted);
    }
    sort_slots(&mut roots, &keys);

    for &(manager, employee) in &walk.cuts {
        tracing::warn!(
            manager = %kept[manager].id,
            employee = %kept[employee].id,
            "cyclic manager reference cut"
        );
        report.cut_edges.push(CutEdge {
            manager_id: kept[manager].id.clone(),
            employee_id: kept[employee].id.clone(),
        });
    }
    if !walk.cuts.is_empty() {
        report.cycles = cycle_groups(&managers)
            .into_iter()
            .map(|group| group.into_iter().map(|slot| kept[slot].id.clone()).collect())
            .collect();
    }

    let Walk {
        level,
        parent,
        emitted,
        ..
    } = walk;

    let nodes: Vec<OrgNode> = kept
        .into_iter()
        .zip(level)
        .zip(parent)
        .zip(emitted)
        .map(|(((record, level), parent), children)| OrgNode {
            record: record.clone(),
            level,
            parent: parent.map(NodeIdx::new),
            children: children.into_iter().map(NodeIdx::new).collect(),
        })
        .collect();
    let roots: Vec<NodeIdx> = roots.into_iter().map(NodeIdx::new).collect();

    report.node_count = nodes.len();
    report.root_count = roots.len();
    tracing::debug!(
        nodes = report.node_count,
        roots = report.root_count,
        cuts = report.cut_edges.len(),
        "org chart built"
    );

    (Forest::from_parts(nodes, roots), report)
}

/// Mutable state of the top-down level walk.
struct Walk<'a> {
    reports: &'a [Vec<usize>],
    visited: Vec<bool>,
    on_path: Vec<bool>,
    level: Vec<u32>,
    parent: Vec<Option<usize>>,
    /// Report lists actually attached (cut edges removed).
    emitted: Vec<Vec<usize>>,
    /// (manager slot, employee slot) edges that would have closed a cycle.
    cuts: Vec<(usize, usize)>,
}

impl<'a> Walk<'a> {
    fn new(reports: &'a [Vec<usize>]) -> Self {
        let n = reports.len();
        Self {
            reports,
            visited: vec![false; n],
            on_path: vec![false; n],
            level: vec![0; n],
            parent: vec![None; n],
            emitted: vec![Vec::new(); n],
            cuts: Vec::new(),
        }
    }

    fn enter(&mut self, slot: usize, level: u32, parent: Option<usize>) {
        self.visited[slot] = true;
        self.on_path[slot] = true;
        self.level[slot] = level;
        self.parent[slot] = parent;
    }

    /// Walk the subtree under `root`, which becomes level 0.
    fn attach(&mut self, root: usize) {
        self.enter(root, 0, None);
        // (slot, next report position)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(top) = stack.last_mut() {
            let (slot, position) = *top;
            let Some(&child) = self.reports[slot].get(position) else {
                self.on_path[slot] = false;
                stack.pop();
                continue;
            };
            top.1 += 1;

            if self.on_path[child] || self.visited[child] {
                self.cuts.push((slot, child));
                continue;
            }

            self.enter(child, self.level[slot] + 1, Some(slot));
            self.emitted[slot].push(child);
            stack.push((child, 0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, manager: Option<&str>) -> EmployeeRecord {
        let record = EmployeeRecord::new(id, id, "");
        match manager {
            Some(manager) => record.with_manager(manager),
            None => record,
        }
    }

    fn ids(forest: &Forest, slots: &[NodeIdx]) -> Vec<String> {
        slots.iter().map(|&i| forest.node(i).id().to_string()).collect()
    }

    fn children_of(forest: &Forest, id: &str) -> Vec<String> {
        let idx = forest.index_of(id).unwrap();
        ids(forest, &forest.node(idx).children)
    }

    fn level_of(forest: &Forest, id: &str) -> u32 {
        forest.get(id).unwrap().level
    }

    fn assert_level_invariant(forest: &Forest) {
        for (_, node) in forest.iter() {
            match node.parent {
                None => assert_eq!(node.level, 0, "root {} must be level 0", node.id()),
                Some(parent) => assert_eq!(
                    node.level,
                    forest.node(parent).level + 1,
                    "level of {} must be parent level + 1",
                    node.id()
                ),
            }
        }
    }

    /// Every node appears exactly once when walking from the roots.
    fn assert_complete(forest: &Forest) {
        let order = forest.preorder();
        assert_eq!(order.len(), forest.len());
        let mut seen = std::collections::HashSet::new();
        for idx in order {
            assert!(seen.insert(idx), "{} reached twice", forest.node(idx).id());
        }
    }

    #[test]
    fn test_empty_roster() {
        let (forest, report) = build(&[]);
        assert!(forest.is_empty());
        assert_eq!(report, BuildReport::default());
    }

    #[test]
    fn test_example_a() {
        let records = [
            rec("A", None),
            rec("B", Some("A")),
            rec("C", Some("B")),
            rec("D", Some("B")),
        ];
        let (forest, report) = build(&records);

        assert_eq!(ids(&forest, forest.roots()), ["A"]);
        assert_eq!(children_of(&forest, "A"), ["B"]);
        assert_eq!(children_of(&forest, "B"), ["C", "D"]);
        assert_eq!(level_of(&forest, "A"), 0);
        assert_eq!(level_of(&forest, "B"), 1);
        assert_eq!(level_of(&forest, "C"), 2);
        assert_eq!(level_of(&forest, "D"), 2);
        assert!(!report.has_repairs());
        assert_eq!(report.node_count, 4);
        assert_eq!(report.root_count, 1);
    }

    #[test]
    fn test_dangling_manager_becomes_root() {
        let records = [rec("A", None), rec("B", Some("ghost"))];
        let (forest, report) = build(&records);
        assert_eq!(ids(&forest, forest.roots()), ["A", "B"]);
        assert_eq!(level_of(&forest, "B"), 0);
        assert!(!report.has_repairs());
    }

    #[test]
    fn test_example_c_two_cycle_terminates() {
        let records = [rec("X", Some("Y")), rec("Y", Some("X"))];
        let (forest, report) = build(&records);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest.roots().len(), 1);
        let root = forest.node(forest.roots()[0]).id().to_string();
        let other = if root == "X" { "Y" } else { "X" };
        assert_eq!(children_of(&forest, &root), [other]);
        assert!(children_of(&forest, other).is_empty());
        assert_eq!(report.cut_edges.len(), 1);
        assert_eq!(report.cut_edges[0].employee_id, root);
        assert_eq!(report.cycles, vec![vec!["X".to_string(), "Y".to_string()]]);
        assert_level_invariant(&forest);
        assert_complete(&forest);
    }

    #[test]
    fn test_self_manager() {
        let records = [rec("A", Some("A")), rec("B", Some("A"))];
        let (forest, report) = build(&records);
        assert_eq!(ids(&forest, forest.roots()), ["A"]);
        assert_eq!(children_of(&forest, "A"), ["B"]);
        assert_eq!(report.promoted_roots, ["A"]);
        assert_eq!(
            report.cut_edges,
            vec![CutEdge {
                manager_id: "A".into(),
                employee_id: "A".into()
            }]
        );
        assert_complete(&forest);
    }

    #[test]
    fn test_tail_into_cycle_keeps_everyone() {
        // T -> X <-> Y, plus an unrelated acyclic tree R -> S
        let records = [
            rec("T", Some("X")),
            rec("R", None),
            rec("X", Some("Y")),
            rec("S", Some("R")),
            rec("Y", Some("X")),
        ];
        let (forest, report) = build(&records);

        assert_eq!(forest.len(), 5);
        assert_complete(&forest);
        assert_level_invariant(&forest);
        // Ascending from T finds X first on the loop, so X is promoted.
        assert_eq!(report.promoted_roots, ["X"]);
        assert_eq!(children_of(&forest, "X"), ["T", "Y"]);
        assert_eq!(children_of(&forest, "R"), ["S"]);
        assert_eq!(ids(&forest, forest.roots()), ["R", "X"]);
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let records = [
            rec("A", None),
            rec("B", Some("A")),
            EmployeeRecord::new("B", "Impostor", ""),
        ];
        let (forest, report) = build(&records);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.get("B").unwrap().record.first_name, "B");
        assert_eq!(report.duplicate_ids, ["B"]);
        assert!(report.has_repairs());
    }

    #[test]
    fn test_sibling_order_applied_at_every_level() {
        let records = [
            EmployeeRecord::new("r2", "zara", "").with_job_title("t", "Clerk"),
            EmployeeRecord::new("r1", "Yusuf", "").with_job_title("t", "CEO"),
            EmployeeRecord::new("c1", "mona", "")
                .with_manager("r1")
                .with_job_title("t", "Technician"),
            EmployeeRecord::new("c2", "Karim", "")
                .with_manager("r1")
                .with_job_title("t", "Technician"),
            EmployeeRecord::new("c3", "Zaid", "")
                .with_manager("r1")
                .with_job_title("t", "Head of Field Ops"),
            EmployeeRecord::new("c4", "adel", "").with_manager("r1"),
        ];
        let (forest, _) = build(&records);
        assert_eq!(ids(&forest, forest.roots()), ["r1", "r2"]);
        assert_eq!(children_of(&forest, "r1"), ["c3", "c4", "c2", "c1"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let records: Vec<EmployeeRecord> = (0..200)
            .map(|i| {
                let record = EmployeeRecord::new(format!("e{i}"), format!("n{}", i % 7), "");
                if i == 0 {
                    record
                } else {
                    record.with_manager(format!("e{}", (i * 7919) % 200))
                }
            })
            .collect();

        let (first, first_report) = build(&records);
        let (second, second_report) = build(&records);
        assert_eq!(first, second);
        assert_eq!(first_report, second_report);
        assert_level_invariant(&first);
        assert_complete(&first);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let n = 50_000;
        let records: Vec<EmployeeRecord> = (0..n)
            .map(|i| {
                let record = EmployeeRecord::new(format!("e{i}"), "n", "");
                if i == 0 {
                    record
                } else {
                    record.with_manager(format!("e{}", i - 1))
                }
            })
            .collect();
        let (forest, _) = build(&records);
        assert_eq!(level_of(&forest, &format!("e{}", n - 1)), (n - 1) as u32);
    }

    #[test]
    fn test_large_cycle_terminates() {
        let n = 10_000;
        let records: Vec<EmployeeRecord> = (0..n)
            .map(|i| {
                EmployeeRecord::new(format!("e{i}"), "n", "")
                    .with_manager(format!("e{}", (i + 1) % n))
            })
            .collect();
        let (forest, report) = build(&records);
        assert_eq!(forest.len(), n);
        assert_eq!(forest.roots().len(), 1);
        assert_eq!(report.cut_edges.len(), 1);
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].len(), n);
        assert_complete(&forest);
    }
}
