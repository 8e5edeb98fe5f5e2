//! Projection of the forest and its overlays into a drawable frame.
//!
//! [`Scene`] holds what depends only on tree shape and collapse state (the
//! visible nodes, their layout, the hit-test index). [`render`] combines a
//! scene with the cheap overlays (highlight, zoom, load state) every time a
//! frame is requested.

use std::collections::HashSet;

use serde::Serialize;

use crate::collapse::{CollapseState, Expansion};
use crate::config::OrgChartConfig;
use crate::hierarchy::{Forest, NodeIdx};
use crate::layout::{TidyTreeLayout, TidyTreeResult, TreeShape};
use crate::locate::PathMatch;
use crate::spatial::{NodeCard, SpatialIndex};

/// One visible employee card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNode {
    pub id: String,
    pub initials: String,
    pub display_name: String,
    pub localized_name: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub is_active: bool,
    pub level: u32,
    pub child_count: usize,
    /// Absent for leaves.
    pub expansion: Option<Expansion>,
    /// Hidden report count, shown only while collapsed.
    pub badge: Option<usize>,
    pub highlighted: bool,
    pub is_match: bool,
    pub profile_href: String,
    /// Horizontal centre of the card.
    pub x: f32,
    /// Top edge of the card.
    pub y: f32,
}

/// Line from the bottom centre of a manager card to the top centre of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub from: String,
    pub to: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub highlighted: bool,
}

/// Extent of the laid-out chart, unscaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub card_width: f32,
    pub card_height: f32,
}

/// Why the chart has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EmptyState {
    NoEmployees,
    LoadFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub nodes: Vec<RenderedNode>,
    pub connectors: Vec<Connector>,
    pub zoom: f32,
    pub bounds: Bounds,
    pub loading: bool,
    pub empty_state: Option<EmptyState>,
}

/// Visible nodes in pre-order with their layout.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Visible nodes in pre-order; slot `i` in `layout` belongs to `visible[i]`.
    pub visible: Vec<NodeIdx>,
    pub layout: TidyTreeResult,
    pub index: SpatialIndex,
}

impl Scene {
    /// Lay out every node reachable from a root without passing a collapsed node.
    pub fn project(forest: &Forest, collapse: &CollapseState, engine: &TidyTreeLayout) -> Self {
        let visible = forest.preorder_where(|_, node| !collapse.is_collapsed(node.id()));

        let mut slot_of = vec![None; forest.len()];
        for (slot, idx) in visible.iter().enumerate() {
            slot_of[idx.index()] = Some(slot);
        }
        let slots = |ids: &[NodeIdx]| -> Vec<usize> {
            ids.iter().filter_map(|idx| slot_of[idx.index()]).collect()
        };

        let roots = slots(forest.roots());
        let mut children = Vec::with_capacity(visible.len());
        let mut depth = Vec::with_capacity(visible.len());
        for &idx in &visible {
            let node = forest.node(idx);
            depth.push(node.level);
            if collapse.is_collapsed(node.id()) {
                children.push(Vec::new());
            } else {
                children.push(slots(&node.children));
            }
        }

        let layout = engine.compute(TreeShape {
            roots: &roots,
            children: &children,
            depth: &depth,
        });

        let config = engine.config();
        let cards = visible
            .iter()
            .enumerate()
            .map(|(slot, &idx)| {
                NodeCard::new(
                    idx,
                    layout.positions_x[slot],
                    layout.positions_y[slot],
                    config.node_width,
                    config.node_height,
                )
            })
            .collect();

        tracing::debug!(visible = visible.len(), total = forest.len(), "scene projected");
        Self {
            visible,
            layout,
            index: SpatialIndex::from_cards(cards),
        }
    }

    /// `[x0, y0, x1, y1, ...]` in visible order.
    pub fn positions(&self) -> Vec<f32> {
        self.layout
            .positions_x
            .iter()
            .zip(&self.layout.positions_y)
            .flat_map(|(&x, &y)| [x, y])
            .collect()
    }
}

/// Overlays drawn on top of a scene.
#[derive(Debug, Clone, Copy)]
pub struct Overlays<'a> {
    pub collapse: &'a CollapseState,
    pub highlight: Option<&'a PathMatch>,
    pub zoom: f32,
    pub loading: bool,
    pub load_error: Option<&'a str>,
}

/// Build the frame for `scene`. Pure: nothing is mutated.
pub fn render(
    forest: &Forest,
    scene: &Scene,
    overlays: Overlays<'_>,
    config: &OrgChartConfig,
) -> RenderFrame {
    let on_path: HashSet<&str> = overlays
        .highlight
        .map(|found| found.path.iter().map(String::as_str).collect())
        .unwrap_or_default();
    let match_id = overlays.highlight.map(|found| found.match_id.as_str());

    let mut nodes = Vec::with_capacity(scene.visible.len());
    let mut slot_of = vec![None; forest.len()];
    for (slot, &idx) in scene.visible.iter().enumerate() {
        slot_of[idx.index()] = Some(slot);
        let node = forest.node(idx);
        let record = &node.record;
        let expansion = overlays.collapse.state_of(forest, node.id());
        nodes.push(RenderedNode {
            id: record.id.clone(),
            initials: record.initials(),
            display_name: record.full_name(),
            localized_name: record.localized_full_name(),
            job_title: record.job_title_name().map(str::to_string),
            department: record.department_name().map(str::to_string),
            is_active: record.is_active,
            level: node.level,
            child_count: node.children.len(),
            expansion,
            badge: (expansion == Some(Expansion::Collapsed)).then_some(node.children.len()),
            highlighted: on_path.contains(node.id()),
            is_match: match_id == Some(node.id()),
            profile_href: config.profile_href(&record.id),
            x: scene.layout.positions_x[slot],
            y: scene.layout.positions_y[slot],
        });
    }

    let card_height = config.layout.node_height;
    let mut connectors = Vec::new();
    for (slot, &idx) in scene.visible.iter().enumerate() {
        let parent = forest.node(idx);
        for &child in &parent.children {
            let Some(child_slot) = slot_of[child.index()] else {
                continue;
            };
            let child_id = forest.node(child).id();
            connectors.push(Connector {
                from: parent.id().to_string(),
                to: child_id.to_string(),
                x1: scene.layout.positions_x[slot],
                y1: scene.layout.positions_y[slot] + card_height,
                x2: scene.layout.positions_x[child_slot],
                y2: scene.layout.positions_y[child_slot],
                highlighted: on_path.contains(parent.id()) && on_path.contains(child_id),
            });
        }
    }

    let empty_state = match overlays.load_error {
        Some(message) => Some(EmptyState::LoadFailed {
            message: message.to_string(),
        }),
        None if forest.is_empty() && !overlays.loading => Some(EmptyState::NoEmployees),
        None => None,
    };

    RenderFrame {
        nodes,
        connectors,
        zoom: overlays.zoom,
        bounds: Bounds {
            width: scene.layout.width,
            height: scene.layout.height,
            card_width: config.layout.node_width,
            card_height,
        },
        loading: overlays.loading,
        empty_state,
    }
}
