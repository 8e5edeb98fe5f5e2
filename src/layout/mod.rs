//! Layout for the visible part of the org chart.
//!
//! Positions are computed on the CPU from the visible forest only, so a
//! collapsed subtree costs nothing until it is opened.

pub mod tidy_tree;

pub use tidy_tree::{LayoutConfig, TidyTreeLayout, TidyTreeResult, TreeShape};
