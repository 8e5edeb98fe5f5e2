//! Employee search and path-to-root.
//!
//! Matching runs over the flat roster, not the tree: the first record in
//! roster order that matches wins, whatever its position in the chart. The
//! path then climbs manager references with the same loop guard the builder
//! uses, so a corrupt chain ends instead of spinning.

use std::collections::HashMap;

use serde::Serialize;

use crate::directory::EmployeeRecord;
use crate::hierarchy::ascend;

/// A search hit and its chain of managers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMatch {
    pub match_id: String,
    /// `[match, manager, manager's manager, ..., topmost]`.
    pub path: Vec<String>,
}

impl PathMatch {
    /// Path members above the match (the ones that must be expanded).
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.path.iter().skip(1).map(String::as_str)
    }
}

/// Whether `record` matches an already lowercased, trimmed needle.
fn matches(record: &EmployeeRecord, needle: &str) -> bool {
    let first = record.first_name.to_lowercase();
    let last = record.last_name.to_lowercase();
    first.contains(needle)
        || last.contains(needle)
        || format!("{first} {last}").contains(needle)
        || record.employee_no.to_lowercase().contains(needle)
}

/// Find the first record matching `query` and the path up to its top manager.
///
/// The query is trimmed and compared case-insensitively against first name,
/// last name, "first last", and employee number. Blank queries match nothing.
/// Only the first record carrying a given id is searched, as in the builder.
pub fn locate(query: &str, records: &[EmployeeRecord]) -> Option<PathMatch> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut slot_of: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (slot, record) in records.iter().enumerate() {
        slot_of.entry(record.id.as_str()).or_insert(slot);
    }

    // Later records with a repeated id are not in the chart; skip them.
    let start = records.iter().enumerate().position(|(slot, record)| {
        slot_of.get(record.id.as_str()) == Some(&slot) && matches(record, &needle)
    })?;

    let ascent = ascend(start, |slot| {
        records[slot]
            .manager_id
            .as_deref()
            .and_then(|manager| slot_of.get(manager).copied())
    });
    if let Some(revisited) = ascent.revisited {
        tracing::warn!(
            employee = %records[start].id,
            loops_at = %records[revisited].id,
            "manager chain loops; path truncated"
        );
    }

    Some(PathMatch {
        match_id: records[start].id.clone(),
        path: ascent
            .path
            .into_iter()
            .map(|slot| records[slot].id.clone())
            .collect(),
    })
}
