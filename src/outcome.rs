use reqwest::StatusCode;
use serde_json::Value;

/// Result of the authorized GET.
///
/// Only `Success` carries a payload. The other variants are the absent
/// result, kept apart so callers can tell a 404 from a dead connection.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// 2xx response with a JSON body, returned uninterpreted
    Success(Value),
    /// Non-success HTTP status
    HttpStatus(StatusCode),
    /// The GET produced no response (connect error, timeout, bad URL)
    Unreachable(String),
    /// 2xx response whose body is not JSON
    Undecodable(String),
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Success(_))
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            QueryOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Collapses to the payload, or `None` for every failure
    pub fn into_payload(self) -> Option<Value> {
        match self {
            QueryOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Status code of a failed response, if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            QueryOutcome::HttpStatus(status) => Some(*status),
            _ => None,
        }
    }
}
