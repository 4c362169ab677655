use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// UTS API key. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only; such a key is never sent
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(<redacted, {} chars>)", self.0.len())
    }
}

/// Ticket-granting ticket: the location returned by the API key exchange.
///
/// It stays valid for a bounded window on the server side (eight hours for
/// UTS). Nothing here renews it; callers construct a new client once
/// service ticket requests start being rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketGrantingTicket {
    location: String,
    acquired_at: DateTime<Utc>,
}

impl TicketGrantingTicket {
    pub fn new(location: impl Into<String>) -> Self {
        Self::with_acquisition_time(location, Utc::now())
    }

    pub fn with_acquisition_time(location: impl Into<String>, acquired_at: DateTime<Utc>) -> Self {
        Self {
            location: location.into(),
            acquired_at,
        }
    }

    /// URL that service tickets are requested from
    pub fn location(&self) -> &str {
        &self.location
    }

    /// When the API key exchange returned this ticket
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.acquired_at
    }

    /// Whether the ticket is older than `lifetime`
    pub fn is_past(&self, lifetime: Duration) -> bool {
        self.age() > lifetime
    }
}

/// A single-use service ticket.
///
/// Not `Clone`: a ticket is moved into the query that spends it.
#[derive(PartialEq, Eq)]
pub struct ServiceTicket(String);

impl ServiceTicket {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ServiceTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTicket(<redacted, {} chars>)", self.0.len())
    }
}
