//! Spatial indexing for O(log n) hit testing.
//!
//! An R-tree over the laid-out node cards resolves a click in layout
//! coordinates to the card under it.

mod rtree;

pub use rtree::{NodeCard, SpatialIndex};
