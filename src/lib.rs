//! Client for the UMLS Terminology Services (UTS) ticket-based authentication.
//!
//! A long-lived API key is exchanged once for a ticket-granting ticket (TGT).
//! Every query then mints a fresh, single-use service ticket from the TGT and
//! sends it as the `ticket` query parameter.
//!
//! ```no_run
//! use umls_client::UmlsClient;
//!
//! # fn main() -> Result<(), umls_client::AuthError> {
//! let client = UmlsClient::new("my-api-key")?;
//! let outcome = client.query_with_params(
//!     "https://uts-ws.nlm.nih.gov/rest/search/current",
//!     [("string", "fracture of carpal bone")],
//! )?;
//! if let Some(payload) = outcome.into_payload() {
//!     println!("{payload}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod form_action;
pub mod logging;
pub mod outcome;
pub mod query_params;
pub mod ticket;

pub use client::UmlsClient;
pub use config::ClientConfig;
pub use error::{AuthError, AuthStage};
pub use outcome::QueryOutcome;
pub use ticket::{ApiKey, ServiceTicket, TicketGrantingTicket};
