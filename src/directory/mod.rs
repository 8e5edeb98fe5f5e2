//! Directory source boundary.
//!
//! The engine never talks to the network. The host performs the requests and
//! hands the payloads back; this module defines the payload types and the
//! request gate that discards stale responses.

mod gate;
mod record;

pub use gate::{RequestGate, RequestTicket};
pub use record::{Department, EmployeeRecord, NamedRef};

use serde::Serialize;

/// Parameters for a roster request the host should perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRequest {
    /// Generation to pass back with the response.
    pub generation: u64,
    /// Page size large enough to make the whole roster resident.
    pub page_size: u32,
    /// Department filter active when the request started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
}
