//! Org Chart - WASM Module
//!
//! Turns a flat employee roster into an interactive organization chart:
//! hierarchy building with cycle defence, expand/collapse state, search with
//! path reveal, tidy-tree layout and hit testing. Compiled to WebAssembly and
//! exposed to JavaScript via wasm-bindgen; the same API is usable natively.
//!
//! # Architecture
//!
//! - `directory`: input records and last-started-wins request gates
//! - `hierarchy`: roster to forest, levels, sibling order, cycle repair
//! - `collapse`: collapse-set overlay and the default policy
//! - `locate`: search and path-to-root
//! - `layout`: Buchheim tidy tree over the visible forest
//! - `spatial`: R-tree hit testing over laid-out cards
//! - `render`: frame projection, zoom, detail snapshot
//! - `controller`: the single owner of screen state

use js_sys::Float32Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod collapse;
pub mod config;
pub mod controller;
pub mod directory;
pub mod error;
pub mod hierarchy;
pub mod layout;
pub mod locate;
pub mod render;
pub mod spatial;

pub use config::OrgChartConfig;
pub use controller::OrgChart;
pub use error::{OrgChartError, Result};

use directory::{Department, EmployeeRecord, RequestTicket};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }
}

/// Serialize for JS with `null` for absent values and plain objects for maps.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

fn ticket(generation: f64) -> RequestTicket {
    RequestTicket(generation as u64)
}

/// Org chart screen exposed to JavaScript.
///
/// The host performs the directory requests: `beginRosterFetch` hands out the
/// request parameters and a generation, and the payload comes back through
/// `completeRosterFetch` (or `failRosterFetch`) with that generation.
/// Responses for superseded generations are ignored.
#[wasm_bindgen]
pub struct OrgChartWasm {
    chart: OrgChart,
}

#[wasm_bindgen]
impl OrgChartWasm {
    /// Create a chart. `config` may be omitted or a partial config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OrgChartWasm, JsError> {
        let config = if config.is_undefined() || config.is_null() {
            OrgChartConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| OrgChartError::payload("config", e))?
        };
        Ok(Self {
            chart: OrgChart::new(config)?,
        })
    }

    // =========================================================================
    // Directory fetches
    // =========================================================================

    /// Start a roster request; returns `{ generation, pageSize, departmentId }`.
    #[wasm_bindgen(js_name = beginRosterFetch)]
    pub fn begin_roster_fetch(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.chart.begin_roster_fetch())
    }

    /// Hand back the roster for `generation`. Returns false if it was stale.
    ///
    /// A payload that cannot be read counts as a failed fetch.
    #[wasm_bindgen(js_name = completeRosterFetch)]
    pub fn complete_roster_fetch(
        &mut self,
        generation: f64,
        records: JsValue,
    ) -> Result<bool, JsError> {
        match serde_wasm_bindgen::from_value::<Vec<EmployeeRecord>>(records) {
            Ok(records) => Ok(self
                .chart
                .complete_roster_fetch(ticket(generation), Ok(records))),
            Err(e) => {
                let err = OrgChartError::payload("roster", e);
                self.chart
                    .complete_roster_fetch(ticket(generation), Err(err.to_string()));
                Err(err.into())
            }
        }
    }

    #[wasm_bindgen(js_name = failRosterFetch)]
    pub fn fail_roster_fetch(&mut self, generation: f64, message: String) -> bool {
        self.chart
            .complete_roster_fetch(ticket(generation), Err(message))
    }

    #[wasm_bindgen(js_name = beginDepartmentFetch)]
    pub fn begin_department_fetch(&mut self) -> f64 {
        self.chart.begin_department_fetch().raw() as f64
    }

    #[wasm_bindgen(js_name = completeDepartmentFetch)]
    pub fn complete_department_fetch(
        &mut self,
        generation: f64,
        departments: JsValue,
    ) -> Result<bool, JsError> {
        let departments: Vec<Department> = serde_wasm_bindgen::from_value(departments)
            .map_err(|e| OrgChartError::payload("department", e))?;
        Ok(self
            .chart
            .complete_department_fetch(ticket(generation), Ok(departments)))
    }

    #[wasm_bindgen(js_name = failDepartmentFetch)]
    pub fn fail_department_fetch(&mut self, generation: f64, message: String) -> bool {
        self.chart
            .complete_department_fetch(ticket(generation), Err(message))
    }

    pub fn departments(&self) -> Result<JsValue, JsError> {
        to_js(self.chart.departments())
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Restrict to one department; pass null or "" for all.
    #[wasm_bindgen(js_name = setDepartmentFilter)]
    pub fn set_department_filter(&mut self, department_id: Option<String>) {
        self.chart.set_department_filter(department_id);
    }

    /// Flip a node; returns "collapsed", "expanded", or null for leaves.
    pub fn toggle(&mut self, id: &str) -> Result<JsValue, JsError> {
        to_js(&self.chart.toggle(id))
    }

    #[wasm_bindgen(js_name = expandAll)]
    pub fn expand_all(&mut self) {
        self.chart.expand_all();
    }

    #[wasm_bindgen(js_name = collapseToDefault)]
    pub fn collapse_to_default(&mut self) {
        self.chart.collapse_to_default();
    }

    /// Returns `{ matchId, path }` or null.
    pub fn search(&mut self, query: &str) -> Result<JsValue, JsError> {
        to_js(&self.chart.search(query))
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> f32 {
        self.chart.zoom_in()
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> f32 {
        self.chart.zoom_out()
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&mut self) -> f32 {
        self.chart.reset_zoom()
    }

    pub fn zoom(&self) -> f32 {
        self.chart.zoom()
    }

    // =========================================================================
    // Detail overlay
    // =========================================================================

    #[wasm_bindgen(js_name = openDetail)]
    pub fn open_detail(&mut self, id: &str) -> Result<JsValue, JsError> {
        let detail = self.chart.open_detail(id)?;
        to_js(&detail)
    }

    /// Open the card under a point on the zoomed drawing; null on a miss.
    #[wasm_bindgen(js_name = openDetailAt)]
    pub fn open_detail_at(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        to_js(&self.chart.open_detail_at(x, y))
    }

    #[wasm_bindgen(js_name = closeDetail)]
    pub fn close_detail(&mut self) {
        self.chart.close_detail();
    }

    pub fn detail(&self) -> Result<JsValue, JsError> {
        to_js(&self.chart.detail())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Everything needed to draw the chart: nodes, connectors, zoom, bounds,
    /// and the empty state.
    pub fn frame(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.chart.frame())
    }

    /// Visible card positions as [x0, y0, x1, y1, ...] in frame order.
    #[wasm_bindgen(js_name = layoutPositions)]
    pub fn layout_positions(&mut self) -> Float32Array {
        let positions = self.chart.layout_positions();
        Float32Array::from(&positions[..])
    }

    /// What the last build repaired (duplicates, cut cycles).
    #[wasm_bindgen(js_name = buildReport)]
    pub fn build_report(&self) -> Result<JsValue, JsError> {
        to_js(self.chart.report())
    }
}

impl Default for OrgChartWasm {
    fn default() -> Self {
        Self {
            chart: OrgChart::default(),
        }
    }
}

#[cfg(test)]
mod integration_tests {
    //! Native end-to-end runs of the controller, from JSON payload to frame.

    use super::*;
    use crate::render::EmptyState;

    const ROSTER_JSON: &str = r#"[
        {"id": "1", "firstName": "Hana", "lastName": "Mansour", "employeeNo": "E-001",
         "jobTitle": {"id": "t0", "name": "CEO"}, "department": {"id": "hq", "name": "HQ"}},
        {"id": "2", "firstName": "Ziad", "lastName": "Karam", "employeeNo": "E-002",
         "managerId": "1", "jobTitle": {"id": "t1", "name": "Technician"},
         "department": {"id": "field", "name": "Field"}},
        {"id": "3", "firstName": "Basma", "lastName": "Yousef", "employeeNo": "E-003",
         "managerId": "1", "jobTitle": {"id": "t2", "name": "Head of Field"},
         "department": {"id": "field", "name": "Field"}},
        {"id": "4", "firstName": "Adel", "lastName": "Fares", "employeeNo": "E-004",
         "managerId": "3", "department": {"id": "field", "name": "Field"}},
        {"id": "5", "firstName": "Maya", "lastName": "Saleh", "employeeNo": "E-005",
         "managerId": "4", "isActive": false, "department": {"id": "field", "name": "Field"}},
        {"id": "6", "firstName": "Rami", "lastName": "Aoun", "employeeNo": "E-006",
         "managerId": "", "extraField": 42}
    ]"#;

    fn loaded_chart() -> OrgChart {
        let records: Vec<EmployeeRecord> = serde_json::from_str(ROSTER_JSON).unwrap();
        let mut chart = OrgChart::default();
        let request = chart.begin_roster_fetch();
        assert_eq!(request.page_size, config::DEFAULT_ROSTER_PAGE_SIZE);
        assert!(chart.complete_roster_fetch(request.generation.into(), Ok(records)));
        chart
    }

    #[test]
    fn test_json_roster_to_frame() {
        let mut chart = loaded_chart();

        // Roots: Hana (CEO) first as manager-like, then Rami (blank managerId).
        let roots: Vec<&str> = chart
            .forest()
            .roots()
            .iter()
            .map(|&r| chart.forest().node(r).id())
            .collect();
        assert_eq!(roots, ["1", "6"]);

        // Under Hana: "Head of Field" sorts before "Technician".
        let frame = chart.frame();
        let ids: Vec<&str> = frame.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["1", "3", "4", "2", "6"]);

        let adel = &frame.nodes[2];
        assert_eq!(adel.level, 2);
        assert_eq!(adel.badge, Some(1));
        assert_eq!(adel.initials, "AF");
        assert_eq!(adel.profile_href, "/employees/4");

        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["nodes"][0]["displayName"], "Hana Mansour");
        assert_eq!(json["nodes"][2]["expansion"], "collapsed");
        assert!(json["emptyState"].is_null());
        assert_eq!(json["zoom"], 1.0);
    }

    #[test]
    fn test_search_by_employee_number_reveals_inactive_leaf() {
        let mut chart = loaded_chart();
        let found = chart.search("e-005").cloned().unwrap();
        assert_eq!(found.path, ["5", "4", "3", "1"]);

        let frame = chart.frame();
        let maya = frame.nodes.iter().find(|n| n.id == "5").unwrap();
        assert!(maya.is_match);
        assert!(!maya.is_active);
        let lit = frame.connectors.iter().filter(|c| c.highlighted).count();
        assert_eq!(lit, 3);
    }

    #[test]
    fn test_department_filter_and_refetch() {
        let mut chart = loaded_chart();
        chart.set_department_filter(Some("field".into()));
        let request = chart.begin_roster_fetch();
        assert_eq!(request.department_id.as_deref(), Some("field"));

        // Server-side filtered payload arrives; local filter agrees with it.
        let field: Vec<EmployeeRecord> = serde_json::from_str::<Vec<EmployeeRecord>>(ROSTER_JSON)
            .unwrap()
            .into_iter()
            .filter(|r| r.department_id() == Some("field"))
            .collect();
        chart.complete_roster_fetch(request.generation.into(), Ok(field));

        let roots: Vec<&str> = chart
            .forest()
            .roots()
            .iter()
            .map(|&r| chart.forest().node(r).id())
            .collect();
        assert_eq!(roots, ["3", "2"]);
        assert_eq!(chart.forest().len(), 4);
    }

    #[test]
    fn test_cyclic_roster_reports_and_renders() {
        let records: Vec<EmployeeRecord> = serde_json::from_str(
            r#"[
                {"id": "x", "firstName": "Xavier", "lastName": "N", "managerId": "y"},
                {"id": "y", "firstName": "Yasmin", "lastName": "N", "managerId": "x"},
                {"id": "x", "firstName": "Duplicate", "lastName": "N"}
            ]"#,
        )
        .unwrap();
        let mut chart = OrgChart::default();
        let request = chart.begin_roster_fetch();
        chart.complete_roster_fetch(request.generation.into(), Ok(records));

        let report = chart.report().clone();
        assert_eq!(report.node_count, 2);
        assert_eq!(report.root_count, 1);
        assert_eq!(report.duplicate_ids, ["x"]);
        assert_eq!(report.cut_edges.len(), 1);
        assert_eq!(report.cycles, [vec!["x".to_string(), "y".to_string()]]);

        let frame = chart.frame();
        assert_eq!(frame.nodes.len(), 2);
        assert_eq!(frame.connectors.len(), 1);
        assert!(chart.search("yasmin").is_some());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cutEdges"][0]["employeeId"], "x");
    }

    #[test]
    fn test_deep_chain_end_to_end() {
        let depth = 10_000;
        let mut records = vec![EmployeeRecord::new("e0", "Root", "Person")];
        for i in 1..depth {
            records.push(
                EmployeeRecord::new(format!("e{i}"), format!("Person{i}"), "Chain")
                    .with_manager(format!("e{}", i - 1)),
            );
        }
        records.push(
            EmployeeRecord::new("target", "Needle", "Deep").with_manager(format!("e{}", depth - 1)),
        );

        let mut chart = OrgChart::default();
        let request = chart.begin_roster_fetch();
        chart.complete_roster_fetch(request.generation.into(), Ok(records));
        assert_eq!(chart.forest().len(), depth + 1);

        let found = chart.search("needle").cloned().unwrap();
        assert_eq!(found.path.len(), depth + 1);

        let frame = chart.frame();
        assert_eq!(frame.nodes.len(), depth + 1);
        let needle = frame.nodes.last().unwrap();
        assert_eq!(needle.id, "target");
        assert_eq!(needle.level, depth as u32);
        assert_eq!(chart.layout_positions().len(), (depth + 1) * 2);
    }

    #[test]
    fn test_stale_sequence_keeps_latest_roster() {
        let mut chart = OrgChart::default();
        let first = chart.begin_roster_fetch();
        let second = chart.begin_roster_fetch();

        let latest: Vec<EmployeeRecord> = serde_json::from_str(ROSTER_JSON).unwrap();
        assert!(chart.complete_roster_fetch(second.generation.into(), Ok(latest)));
        assert!(!chart.complete_roster_fetch(
            first.generation.into(),
            Ok(vec![EmployeeRecord::new("old", "Old", "Roster")])
        ));
        assert_eq!(chart.forest().len(), 6);
        assert!(!chart.forest().contains("old"));
    }

    #[test]
    fn test_load_failure_then_zoom_bounds() {
        let mut chart = OrgChart::default();
        let request = chart.begin_roster_fetch();
        chart.complete_roster_fetch(request.generation.into(), Err("network error".into()));

        let frame = chart.frame();
        assert_eq!(
            frame.empty_state,
            Some(EmptyState::LoadFailed {
                message: "network error".into()
            })
        );
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["emptyState"]["kind"], "loadFailed");

        for _ in 0..30 {
            chart.zoom_in();
        }
        assert_eq!(chart.zoom(), 1.5);
        for _ in 0..30 {
            chart.zoom_out();
        }
        assert_eq!(chart.zoom(), 0.3);
        assert_eq!(chart.reset_zoom(), 1.0);
    }
}
