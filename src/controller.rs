//! Screen controller.
//!
//! [`OrgChart`] owns every piece of mutable screen state: the roster, the
//! forest built from it, the collapse and highlight overlays, zoom, the
//! detail overlay, and the request gates. State changes only through the
//! named transitions below.
//!
//! Any roster or filter change rebuilds the forest wholesale, resets the
//! collapse set to the default policy, clears the highlight, and closes the
//! detail overlay if its employee is gone.

use crate::collapse::{CollapseState, Expansion};
use crate::config::OrgChartConfig;
use crate::directory::{Department, EmployeeRecord, RequestGate, RequestTicket, RosterRequest};
use crate::error::{OrgChartError, Result};
use crate::hierarchy::{build, BuildReport, Forest};
use crate::layout::TidyTreeLayout;
use crate::locate::{locate, PathMatch};
use crate::render::{render, EmployeeDetail, Overlays, RenderFrame, Scene, Zoom};

pub struct OrgChart {
    config: OrgChartConfig,
    layout: TidyTreeLayout,

    // Directory data
    roster: Vec<EmployeeRecord>,
    departments: Vec<Department>,
    department_filter: Option<String>,
    /// Roster after filters; the forest and search both use this.
    filtered: Vec<EmployeeRecord>,
    roster_gate: RequestGate,
    department_gate: RequestGate,
    roster_loading: bool,
    load_error: Option<String>,

    // Derived
    forest: Forest,
    report: BuildReport,

    // Overlays
    collapse: CollapseState,
    highlight: Option<PathMatch>,
    zoom: Zoom,
    detail: Option<String>,

    /// Visible layout, dropped whenever shape or collapse state changes.
    scene: Option<Scene>,
}

impl OrgChart {
    pub fn new(config: OrgChartConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    pub fn with_defaults() -> Self {
        Self::from_valid(OrgChartConfig::default())
    }

    fn from_valid(config: OrgChartConfig) -> Self {
        Self {
            layout: TidyTreeLayout::new(config.layout.clone()),
            zoom: Zoom::new(config.zoom.clone()),
            config,
            roster: Vec::new(),
            departments: Vec::new(),
            department_filter: None,
            filtered: Vec::new(),
            roster_gate: RequestGate::new(),
            department_gate: RequestGate::new(),
            roster_loading: false,
            load_error: None,
            forest: Forest::empty(),
            report: BuildReport::default(),
            collapse: CollapseState::new(),
            highlight: None,
            detail: None,
            scene: None,
        }
    }

    // =========================================================================
    // Directory fetches
    // =========================================================================

    /// Start a roster request. The host performs it and reports back with the
    /// returned generation.
    pub fn begin_roster_fetch(&mut self) -> RosterRequest {
        let ticket = self.roster_gate.begin();
        self.roster_loading = true;
        tracing::debug!(%ticket, "roster fetch started");
        RosterRequest {
            generation: ticket.raw(),
            page_size: self.config.roster_page_size,
            department_id: self.department_filter.clone(),
        }
    }

    /// Apply a finished roster request. Returns `false` if it was stale.
    pub fn complete_roster_fetch(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<EmployeeRecord>, String>,
    ) -> bool {
        if !self.roster_gate.is_current(ticket) {
            tracing::debug!(%ticket, latest = ?self.roster_gate.latest(), "stale roster response discarded");
            return false;
        }
        self.roster_loading = false;
        match outcome {
            Ok(records) => {
                tracing::info!(%ticket, records = records.len(), "roster applied");
                self.roster = records;
                self.load_error = None;
            }
            Err(message) => {
                tracing::warn!(%ticket, %message, "roster fetch failed");
                self.roster.clear();
                self.load_error = Some(message);
            }
        }
        self.rebuild();
        true
    }

    pub fn begin_department_fetch(&mut self) -> RequestTicket {
        self.department_gate.begin()
    }

    /// Apply a finished department request. Returns `false` if it was stale.
    ///
    /// A failed department load keeps the previous list; the filter control
    /// is not essential to the chart.
    pub fn complete_department_fetch(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<Department>, String>,
    ) -> bool {
        if !self.department_gate.is_current(ticket) {
            tracing::debug!(%ticket, "stale department response discarded");
            return false;
        }
        match outcome {
            Ok(departments) => self.departments = departments,
            Err(message) => tracing::warn!(%ticket, %message, "department fetch failed"),
        }
        true
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn is_loading(&self) -> bool {
        self.roster_loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Restrict the chart to one department (`None` or blank for all).
    pub fn set_department_filter(&mut self, department_id: Option<String>) {
        let department_id = department_id.filter(|id| !id.trim().is_empty());
        if department_id == self.department_filter {
            return;
        }
        self.department_filter = department_id;
        self.rebuild();
    }

    pub fn department_filter(&self) -> Option<&str> {
        self.department_filter.as_deref()
    }

    fn rebuild(&mut self) {
        self.filtered = match &self.department_filter {
            Some(department) => self
                .roster
                .iter()
                .filter(|record| record.department_id() == Some(department.as_str()))
                .cloned()
                .collect(),
            None => self.roster.clone(),
        };

        let (forest, report) = build(&self.filtered);
        tracing::info!(
            nodes = report.node_count,
            roots = report.root_count,
            repaired = report.has_repairs(),
            "org chart rebuilt"
        );
        self.collapse = CollapseState::with_default(&forest);
        self.highlight = None;
        if self.detail.as_deref().is_some_and(|id| !forest.contains(id)) {
            self.detail = None;
        }
        self.forest = forest;
        self.report = report;
        self.scene = None;
    }

    // =========================================================================
    // Collapse
    // =========================================================================

    pub fn toggle(&mut self, id: &str) -> Option<Expansion> {
        let state = self.collapse.toggle(&self.forest, id)?;
        self.scene = None;
        Some(state)
    }

    pub fn expand_all(&mut self) {
        self.collapse.expand_all();
        self.scene = None;
    }

    pub fn collapse_to_default(&mut self) {
        self.collapse.collapse_to_default(&self.forest);
        self.scene = None;
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Highlight the first match for `query` and expand everything above it.
    ///
    /// No match (or a blank query) clears the highlight and leaves the
    /// collapse set alone.
    pub fn search(&mut self, query: &str) -> Option<&PathMatch> {
        let Some(found) = locate(query, &self.filtered) else {
            self.highlight = None;
            return None;
        };

        self.collapse.expand_path(found.ancestors());
        // The tree position can differ from the manager chain after a cycle
        // cut, so open the chart ancestors as well.
        if let Some(mut idx) = self.forest.index_of(&found.match_id) {
            while let Some(parent) = self.forest.node(idx).parent {
                self.collapse.expand_path([self.forest.node(parent).id()]);
                idx = parent;
            }
        }
        tracing::debug!(employee = %found.match_id, depth = found.path.len(), "search matched");

        self.scene = None;
        self.highlight = Some(found);
        self.highlight.as_ref()
    }

    pub fn highlight(&self) -> Option<&PathMatch> {
        self.highlight.as_ref()
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    pub fn zoom(&self) -> f32 {
        self.zoom.level()
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.zoom.zoom_out()
    }

    pub fn reset_zoom(&mut self) -> f32 {
        self.zoom.reset()
    }

    // =========================================================================
    // Detail overlay
    // =========================================================================

    pub fn open_detail(&mut self, id: &str) -> Result<EmployeeDetail> {
        let idx = self
            .forest
            .index_of(id)
            .ok_or_else(|| OrgChartError::UnknownEmployee(id.to_string()))?;
        self.detail = Some(id.to_string());
        Ok(EmployeeDetail::snapshot(&self.forest, idx, &self.config))
    }

    /// Open the detail for the card under a point on the zoomed drawing.
    pub fn open_detail_at(&mut self, screen_x: f32, screen_y: f32) -> Option<EmployeeDetail> {
        let (x, y) = self.zoom.to_layout(screen_x, screen_y);
        let idx = self.scene().index.node_at(x, y)?;
        self.detail = Some(self.forest.node(idx).id().to_string());
        Some(EmployeeDetail::snapshot(&self.forest, idx, &self.config))
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<EmployeeDetail> {
        let idx = self.forest.index_of(self.detail.as_deref()?)?;
        Some(EmployeeDetail::snapshot(&self.forest, idx, &self.config))
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn scene(&mut self) -> &Scene {
        self.scene
            .get_or_insert_with(|| Scene::project(&self.forest, &self.collapse, &self.layout))
    }

    pub fn frame(&mut self) -> RenderFrame {
        let scene = self
            .scene
            .get_or_insert_with(|| Scene::project(&self.forest, &self.collapse, &self.layout));
        let overlays = Overlays {
            collapse: &self.collapse,
            highlight: self.highlight.as_ref(),
            zoom: self.zoom.level(),
            loading: self.roster_loading,
            load_error: self.load_error.as_deref(),
        };
        render(&self.forest, scene, overlays, &self.config)
    }

    /// `[x0, y0, x1, y1, ...]` for the visible nodes, in frame order.
    pub fn layout_positions(&mut self) -> Vec<f32> {
        self.scene().positions()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &OrgChartConfig {
        &self.config
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn collapse(&self) -> &CollapseState {
        &self.collapse
    }

    /// Records the current forest was built from.
    pub fn roster(&self) -> &[EmployeeRecord] {
        &self.filtered
    }
}

impl Default for OrgChart {
    fn default() -> Self {
        Self::with_defaults()
    }
}
