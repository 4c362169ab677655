use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Which of the two authentication round trips failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    /// API key -> ticket-granting ticket
    TicketGranting,
    /// Ticket-granting ticket -> service ticket
    ServiceTicket,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStage::TicketGranting => write!(f, "ticket-granting"),
            AuthStage::ServiceTicket => write!(f, "service-ticket"),
        }
    }
}

/// Errors raised by the authentication handshake.
///
/// An expired ticket-granting ticket is not distinguished from any other
/// rejection; it surfaces as `Rejected` with `stage == ServiceTicket`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("{stage} request failed: {source}")]
    Transport {
        stage: AuthStage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} request rejected with status {status}")]
    Rejected { stage: AuthStage, status: StatusCode },

    #[error("authentication response did not contain a form with an action attribute")]
    MissingFormAction,

    #[error("invalid ticket-granting ticket location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },
}

impl AuthError {
    /// The round trip this error came from, when it came from one
    pub fn stage(&self) -> Option<AuthStage> {
        match self {
            AuthError::Transport { stage, .. } | AuthError::Rejected { stage, .. } => Some(*stage),
            AuthError::MissingFormAction | AuthError::InvalidLocation { .. } => {
                Some(AuthStage::TicketGranting)
            }
            AuthError::EmptyApiKey | AuthError::HttpClient(_) => None,
        }
    }
}
