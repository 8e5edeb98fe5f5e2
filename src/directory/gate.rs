//! Last-started-wins ordering for overlapping directory requests.
//!
//! A user flipping filters quickly can leave several requests in flight. Each
//! request is issued a ticket from a monotonically increasing generation; a
//! response is applied only if its ticket is still the newest one issued.
//! "Last to resolve" never wins on its own.

use std::fmt;

/// Generation number handed out when a request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(pub u64);

impl RequestTicket {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request({})", self.0)
    }
}

impl From<u64> for RequestTicket {
    #[inline]
    fn from(generation: u64) -> Self {
        Self(generation)
    }
}

/// Generation counter for one kind of request.
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    latest: u64,
}

impl RequestGate {
    pub fn new() -> Self {
        Self { latest: 0 }
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    /// Whether a response carrying `ticket` should be applied.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest != 0 && ticket.0 == self.latest
    }

    /// The newest ticket issued so far, if any.
    pub fn latest(&self) -> Option<RequestTicket> {
        (self.latest != 0).then_some(RequestTicket(self.latest))
    }
}
