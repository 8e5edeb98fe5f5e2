//! Presentation of the org chart.
//!
//! Everything here reads the forest and its overlays and never changes tree
//! shape or collapse state.

mod detail;
mod frame;
mod zoom;

pub use detail::EmployeeDetail;
pub use frame::{
    render, Bounds, Connector, EmptyState, Overlays, RenderFrame, RenderedNode, Scene,
};
pub use zoom::{Zoom, ZoomConfig};
