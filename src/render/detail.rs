//! Read-only employee snapshot for the detail overlay.

use serde::Serialize;

use crate::config::OrgChartConfig;
use crate::hierarchy::{Forest, NodeIdx};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    pub id: String,
    pub initials: String,
    pub display_name: String,
    pub localized_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub employee_no: String,
    pub is_active: bool,
    pub job_title: Option<String>,
    pub department: Option<String>,
    /// Manager id as supplied, even if it did not resolve.
    pub manager_id: Option<String>,
    /// Name of the manager this node hangs under in the chart.
    pub manager_name: Option<String>,
    pub direct_reports: usize,
    pub level: u32,
    pub profile_href: String,
}

impl EmployeeDetail {
    pub fn snapshot(forest: &Forest, idx: NodeIdx, config: &OrgChartConfig) -> Self {
        let node = forest.node(idx);
        let record = &node.record;
        Self {
            id: record.id.clone(),
            initials: record.initials(),
            display_name: record.full_name(),
            localized_name: record.localized_full_name(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            employee_no: record.employee_no.clone(),
            is_active: record.is_active,
            job_title: record.job_title_name().map(str::to_string),
            department: record.department_name().map(str::to_string),
            manager_id: record.manager_id.clone(),
            manager_name: forest.parent(idx).map(|parent| parent.record.full_name()),
            direct_reports: node.children.len(),
            level: node.level,
            profile_href: config.profile_href(&record.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::EmployeeRecord;
    use crate::hierarchy::build;

    #[test]
    fn test_snapshot_fields() {
        let mut lead = EmployeeRecord::new("e2", "Rana", "Aziz")
            .with_manager("e1")
            .with_job_title("t1", "Field Manager")
            .with_department("d1", "Operations")
            .with_employee_no("EMP-002");
        lead.email = Some("rana@example.com".into());
        let records = vec![
            EmployeeRecord::new("e1", "Omar", "Said"),
            lead,
            EmployeeRecord::new("e3", "Lina", "Touma").with_manager("e2"),
            EmployeeRecord::new("e4", "Sami", "Haddad").with_manager("e2"),
        ];
        let (forest, _) = build(&records);
        let idx = forest.index_of("e2").unwrap();

        let detail = EmployeeDetail::snapshot(&forest, idx, &OrgChartConfig::default());
        assert_eq!(detail.display_name, "Rana Aziz");
        assert_eq!(detail.initials, "RA");
        assert_eq!(detail.manager_name.as_deref(), Some("Omar Said"));
        assert_eq!(detail.direct_reports, 2);
        assert_eq!(detail.level, 1);
        assert_eq!(detail.job_title.as_deref(), Some("Field Manager"));
        assert_eq!(detail.department.as_deref(), Some("Operations"));
        assert_eq!(detail.email.as_deref(), Some("rana@example.com"));
        assert_eq!(detail.profile_href, "/employees/e2");
    }

    #[test]
    fn test_unresolved_manager_keeps_id_but_no_name() {
        let records = vec![EmployeeRecord::new("e9", "Nour", "Kassem").with_manager("gone")];
        let (forest, _) = build(&records);
        let detail = EmployeeDetail::snapshot(
            &forest,
            forest.index_of("e9").unwrap(),
            &OrgChartConfig::default(),
        );
        assert_eq!(detail.manager_id.as_deref(), Some("gone"));
        assert_eq!(detail.manager_name, None);
        assert_eq!(detail.direct_reports, 0);
    }
}
