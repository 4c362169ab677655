use crate::config::ClientConfig;
use crate::error::{AuthError, AuthStage};
use crate::form_action::extract_form_action;
use crate::outcome::QueryOutcome;
use crate::query_params::merge_with_ticket;
use crate::ticket::{ApiKey, ServiceTicket, TicketGrantingTicket};
use crate::trace_request;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Authenticated client for the UTS REST API.
///
/// Construction performs the API key exchange, so a value of this type
/// always holds a ticket-granting ticket. Every query mints its own service
/// ticket; nothing mutable is shared between calls.
#[derive(Clone)]
pub struct UmlsClient {
    api_key: ApiKey,
    tgt: TicketGrantingTicket,
    config: ClientConfig,
    client: Client,
}

impl UmlsClient {
    /// Exchange `api_key` for a ticket-granting ticket against the public UTS
    /// login service at `https://utslogin.nlm.nih.gov`
    pub fn new(api_key: impl Into<String>) -> Result<Self, AuthError> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Exchange `api_key` for a ticket-granting ticket against the login
    /// service described by `config`.
    ///
    /// A key that is empty or only whitespace fails with
    /// [`AuthError::EmptyApiKey`] without any request being sent.
    pub fn with_config(
        api_key: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self, AuthError> {
        let api_key = ApiKey::new(api_key);
        if api_key.is_empty() {
            return Err(AuthError::EmptyApiKey);
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(AuthError::HttpClient)?;

        let tgt = request_tgt(&client, &config, &api_key)?;
        info!("Obtained ticket-granting ticket");

        Ok(Self {
            api_key,
            tgt,
            config,
            client,
        })
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn ticket_granting_ticket(&self) -> &TicketGrantingTicket {
        &self.tgt
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Mint a fresh service ticket. Always a network round trip.
    pub fn service_ticket(&self) -> Result<ServiceTicket, AuthError> {
        let stage = AuthStage::ServiceTicket;

        if self.tgt.is_past(self.config.tgt_lifetime()) {
            warn!(
                age_minutes = self.tgt.age().num_minutes(),
                "Ticket-granting ticket is older than its expected lifetime"
            );
        }

        trace_request!("POST", "<ticket-granting ticket>");
        let response = self
            .client
            .post(self.tgt.location())
            .headers(auth_headers())
            .form(&[("service", self.config.service.as_str())])
            .send()
            .map_err(|source| transport_error(stage, source))?;

        let body = read_auth_body(response, stage)?;
        debug!(len = body.len(), "Received service ticket");
        Ok(ServiceTicket::new(body))
    }

    /// GET `url` with a fresh service ticket and no other parameters
    pub fn query(&self, url: &str) -> Result<QueryOutcome, AuthError> {
        self.query_with_params(url, std::iter::empty::<(String, String)>())
    }

    /// GET `url` with a fresh service ticket plus `extra_params`.
    ///
    /// Only a failed service ticket request is an error. Any failure of the
    /// GET itself is reported through [`QueryOutcome`].
    ///
    /// An extra parameter named `ticket` overrides the minted service ticket.
    pub fn query_with_params<I, K, V>(
        &self,
        url: &str,
        extra_params: I,
    ) -> Result<QueryOutcome, AuthError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let ticket = self.service_ticket()?;
        let params = merge_with_ticket(ticket, extra_params);

        trace_request!("GET", url);
        let response = match self.client.get(url).query(&params).send() {
            Ok(response) => response,
            Err(e) => {
                // The request URL carries the service ticket
                let e = e.without_url();
                warn!(url, error = %e, "Query request failed");
                return Ok(QueryOutcome::Unreachable(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "Query returned non-success status");
            return Ok(QueryOutcome::HttpStatus(status));
        }

        match response.json::<Value>() {
            Ok(payload) => Ok(QueryOutcome::Success(payload)),
            Err(e) => {
                let e = e.without_url();
                warn!(url, error = %e, "Query response was not JSON");
                Ok(QueryOutcome::Undecodable(e.to_string()))
            }
        }
    }

    /// [`Self::query_with_params`] collapsed to `Some(payload)` or `None`
    pub fn query_value<I, K, V>(
        &self,
        url: &str,
        extra_params: I,
    ) -> Result<Option<Value>, AuthError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Ok(self.query_with_params(url, extra_params)?.into_payload())
    }
}

fn auth_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));
    headers
}

/// Drops the URL from the error: it may be the ticket-granting ticket location
fn transport_error(stage: AuthStage, source: reqwest::Error) -> AuthError {
    AuthError::Transport {
        stage,
        source: source.without_url(),
    }
}

fn read_auth_body(response: Response, stage: AuthStage) -> Result<String, AuthError> {
    let status = response.status();
    if !status.is_success() {
        warn!(%status, %stage, "Authentication request rejected");
        return Err(AuthError::Rejected { stage, status });
    }

    response
        .text()
        .map_err(|source| transport_error(stage, source))
}

fn request_tgt(
    client: &Client,
    config: &ClientConfig,
    api_key: &ApiKey,
) -> Result<TicketGrantingTicket, AuthError> {
    let stage = AuthStage::TicketGranting;
    let auth_url = config.auth_url();

    trace_request!("POST", auth_url);
    let response = client
        .post(&auth_url)
        .headers(auth_headers())
        .form(&[("apikey", api_key.as_str())])
        .send()
        .map_err(|source| transport_error(stage, source))?;

    let html = read_auth_body(response, stage)?;
    let action = extract_form_action(&html).ok_or(AuthError::MissingFormAction)?;
    let location = resolve_location(&auth_url, action)?;

    Ok(TicketGrantingTicket::new(location))
}

/// Absolute actions are kept verbatim; relative ones are joined onto the
/// URL the API key was posted to.
fn resolve_location(auth_url: &str, action: String) -> Result<String, AuthError> {
    if Url::parse(&action).is_ok() {
        return Ok(action);
    }

    match Url::parse(auth_url).and_then(|base| base.join(&action)) {
        Ok(url) => Ok(url.to_string()),
        Err(e) => Err(AuthError::InvalidLocation {
            location: action,
            reason: e.to_string(),
        }),
    }
}
