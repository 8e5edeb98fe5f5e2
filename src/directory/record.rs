//! Employee and department records as delivered by the directory service.
//!
//! These types are the input side of the engine. They are deserialized from
//! camelCase JSON and never mutated by the engine; every derived structure
//! (forest, overlays, frames) is rebuilt from them.

use serde::{Deserialize, Deserializer, Serialize};

/// A named reference to another directory entity (department, job title).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A department, used only to populate the filter control.
pub type Department = NamedRef;

/// One employee as supplied by the directory.
///
/// The record is untrusted: `manager_id` may be absent, empty, dangling, or
/// part of a cycle. Unknown JSON fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub employee_no: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(
        default,
        deserialize_with = "non_empty_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<NamedRef>,
}

fn default_active() -> bool {
    true
}

/// Treat `""` (and whitespace) the same as a missing manager.
fn non_empty_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|id| !id.trim().is_empty()))
}

impl EmployeeRecord {
    /// Minimal active record with just a name; everything else empty.
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            localized_first_name: None,
            localized_last_name: None,
            email: None,
            phone: None,
            employee_no: String::new(),
            is_active: true,
            manager_id: None,
            department: None,
            job_title: None,
        }
    }

    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        let manager_id = manager_id.into();
        self.manager_id = (!manager_id.trim().is_empty()).then_some(manager_id);
        self
    }

    pub fn with_job_title(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.job_title = Some(NamedRef::new(id, name));
        self
    }

    pub fn with_department(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.department = Some(NamedRef::new(id, name));
        self
    }

    pub fn with_employee_no(mut self, employee_no: impl Into<String>) -> Self {
        self.employee_no = employee_no.into();
        self
    }

    /// "First Last", trimmed so a missing half doesn't leave a stray space.
    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }

    /// Localized "First Last", if either localized half is present.
    pub fn localized_full_name(&self) -> Option<String> {
        match (&self.localized_first_name, &self.localized_last_name) {
            (None, None) => None,
            (first, last) => {
                let name = join_name(
                    first.as_deref().unwrap_or_default(),
                    last.as_deref().unwrap_or_default(),
                );
                (!name.is_empty()).then_some(name)
            }
        }
    }

    /// Up to two uppercase initials from the first and last name.
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn job_title_name(&self) -> Option<&str> {
        self.job_title.as_ref().map(|t| t.name.as_str())
    }

    pub fn department_name(&self) -> Option<&str> {
        self.department.as_ref().map(|d| d.name.as_str())
    }

    pub fn department_id(&self) -> Option<&str> {
        self.department.as_ref().map(|d| d.id.as_str())
    }
}

fn join_name(first: &str, last: &str) -> String {
    let first = first.trim();
    let last = last.trim();
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first.to_string(),
        (true, false) => last.to_string(),
        (true, true) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "id": "e-7",
            "firstName": "Layla",
            "lastName": "Haddad",
            "localizedFirstName": "ليلى",
            "email": "layla@example.com",
            "employeeNo": "EMP-007",
            "isActive": false,
            "managerId": "e-1",
            "department": {"id": "d-2", "name": "Operations"},
            "jobTitle": {"id": "j-3", "name": "Operations Manager"},
            "createdAt": "2024-01-01"
        }"#;

        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "e-7");
        assert_eq!(record.manager_id.as_deref(), Some("e-1"));
        assert!(!record.is_active);
        assert_eq!(record.department_name(), Some("Operations"));
        assert_eq!(record.job_title_name(), Some("Operations Manager"));
        assert_eq!(record.localized_full_name().as_deref(), Some("ليلى"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let record: EmployeeRecord = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(record.is_active);
        assert_eq!(record.manager_id, None);
        assert_eq!(record.first_name, "");
        assert_eq!(record.localized_full_name(), None);
    }

    #[test]
    fn test_empty_manager_id_is_absent() {
        let record: EmployeeRecord =
            serde_json::from_str(r#"{"id": "x", "managerId": "  "}"#).unwrap();
        assert_eq!(record.manager_id, None);

        let record: EmployeeRecord =
            serde_json::from_str(r#"{"id": "x", "managerId": null}"#).unwrap();
        assert_eq!(record.manager_id, None);

        assert_eq!(EmployeeRecord::new("x", "A", "B").with_manager("").manager_id, None);
    }

    #[test]
    fn test_names_and_initials() {
        let record = EmployeeRecord::new("1", "omar", "said");
        assert_eq!(record.full_name(), "omar said");
        assert_eq!(record.initials(), "OS");

        let record = EmployeeRecord::new("2", "", "Said");
        assert_eq!(record.full_name(), "Said");
        assert_eq!(record.initials(), "S");

        let record = EmployeeRecord::new("3", "", "");
        assert_eq!(record.initials(), "");
    }
}
