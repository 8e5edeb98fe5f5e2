//! Screen-level configuration.
//!
//! Every field has a default, so the host may pass `{}` (or nothing) and
//! override only what it needs. Values arrive from JavaScript as a plain
//! object in camelCase.

use serde::{Deserialize, Serialize};

use crate::error::{OrgChartError, Result};
use crate::layout::LayoutConfig;
use crate::render::ZoomConfig;

/// Roster page size; large enough that the whole roster is resident.
pub const DEFAULT_ROSTER_PAGE_SIZE: u32 = 10_000;

/// Route prefix of the external employee profile view.
pub const DEFAULT_PROFILE_BASE: &str = "/employees/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrgChartConfig {
    pub layout: LayoutConfig,
    pub zoom: ZoomConfig,
    /// Prefix joined with an employee id to form the profile link.
    pub profile_base: String,
    pub roster_page_size: u32,
}

impl Default for OrgChartConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            zoom: ZoomConfig::default(),
            profile_base: DEFAULT_PROFILE_BASE.to_string(),
            roster_page_size: DEFAULT_ROSTER_PAGE_SIZE,
        }
    }
}

impl OrgChartConfig {
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.zoom.validate()?;
        if self.roster_page_size == 0 {
            return Err(OrgChartError::InvalidConfig(
                "rosterPageSize must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn profile_href(&self, employee_id: &str) -> String {
        format!("{}{}", self.profile_base, employee_id)
    }
}
