//! Sibling ordering.
//!
//! Within every sibling group, people with manager-like titles come first;
//! each of the two groups is then ordered by first name, ignoring case. The
//! sort is stable, so equal keys keep their roster order.

use std::cmp::Ordering;

use crate::directory::EmployeeRecord;

/// Title fragments that mark a role as manager-like.
pub const MANAGER_KEYWORDS: [&str; 5] = ["manager", "head", "director", "ceo", "gm"];

/// Whether a job title reads as a management role.
///
/// Substring match, case-insensitive, against [`MANAGER_KEYWORDS`].
pub fn is_manager_like(title: &str) -> bool {
    let title = title.to_lowercase();
    MANAGER_KEYWORDS.iter().any(|keyword| title.contains(keyword))
}

/// Precomputed sort key for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SiblingKey {
    manager_like: bool,
    first_name: String,
}

impl SiblingKey {
    pub(crate) fn of(record: &EmployeeRecord) -> Self {
        Self {
            manager_like: record.job_title_name().is_some_and(is_manager_like),
            first_name: record.first_name.to_lowercase(),
        }
    }
}

impl Ord for SiblingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // `true` must sort first.
        other
            .manager_like
            .cmp(&self.manager_like)
            .then_with(|| self.first_name.cmp(&other.first_name))
    }
}

impl PartialOrd for SiblingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two records by sibling order.
pub fn sibling_order(a: &EmployeeRecord, b: &EmployeeRecord) -> Ordering {
    SiblingKey::of(a).cmp(&SiblingKey::of(b))
}

/// Stable-sort a list of slot indices using precomputed keys.
pub(crate) fn sort_slots(slots: &mut [usize], keys: &[SiblingKey]) {
    slots.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
}
