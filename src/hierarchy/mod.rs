//! Org chart hierarchy.
//!
//! Turns a flat, untrusted roster into a rooted forest with levels and a
//! deterministic sibling order. Corrupt manager references (dangling,
//! duplicated, cyclic) are repaired rather than reported as errors; what was
//! repaired is described by a [`BuildReport`].

mod builder;
mod chain;
mod cycles;
mod forest;
mod ordering;

pub use builder::{build, BuildReport, CutEdge};
pub use chain::{ascend, Ascent};
pub use forest::{Forest, NodeIdx, OrgNode};
pub use ordering::{is_manager_like, sibling_order, MANAGER_KEYWORDS};
