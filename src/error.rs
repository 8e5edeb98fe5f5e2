//! Error type for the org chart engine.
//!
//! Malformed roster data (dangling or cyclic managers, duplicate ids) is not an
//! error: the builder recovers from it. Errors are reserved for payloads that
//! cannot be read at all, bad configuration, and requests naming an employee
//! that isn't in the current forest.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrgChartError {
    #[error("invalid {what} payload: {message}")]
    InvalidPayload { what: &'static str, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("employee `{0}` is not in the current org chart")]
    UnknownEmployee(String),
}

impl OrgChartError {
    pub fn payload(what: &'static str, message: impl ToString) -> Self {
        Self::InvalidPayload {
            what,
            message: message.to_string(),
        }
    }
}

pub type Result<T, E = OrgChartError> = std::result::Result<T, E>;
