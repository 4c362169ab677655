#![allow(dead_code)]

//! In-process stand-in for the UTS login service and a REST endpoint.

use axum::extract::{Form, Path, Query, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use umls_client::ClientConfig;

pub const GOOD_KEY: &str = "good-key";
pub const EXPIRED_KEY: &str = "expired-key";
pub const RELATIVE_KEY: &str = "relative-key";
pub const NO_FORM_KEY: &str = "no-form-key";
pub const SERVICE_TICKET: &str = "ST-xyz";
pub const SERVICE_ID: &str = "http://umlsks.nlm.nih.gov";

#[derive(Debug, Clone)]
pub struct RecordedAuthRequest {
    pub path: String,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub user_agent: Option<String>,
    pub form: HashMap<String, String>,
}

#[derive(Default)]
pub struct MockState {
    base_url: String,
    tgt_posts: AtomicUsize,
    ticket_posts: AtomicUsize,
    auth_requests: Mutex<Vec<RecordedAuthRequest>>,
    queries: Mutex<Vec<String>>,
}

pub struct MockUts {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockUts {
    pub fn start() -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        listener.set_nonblocking(true).expect("set nonblocking");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));

        let state = Arc::new(MockState {
            base_url: base_url.clone(),
            ..MockState::default()
        });
        let app = router(state.clone());

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("build runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("serve");
            });
        });

        Self { base_url, state }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            auth_base_url: self.base_url.clone(),
            timeout_secs: Some(10),
            ..ClientConfig::default()
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn tgt_posts(&self) -> usize {
        self.state.tgt_posts.load(Ordering::SeqCst)
    }

    pub fn ticket_posts(&self) -> usize {
        self.state.ticket_posts.load(Ordering::SeqCst)
    }

    pub fn auth_requests(&self) -> Vec<RecordedAuthRequest> {
        self.state.auth_requests.lock().unwrap().clone()
    }

    /// Raw query strings seen by the REST endpoints, in arrival order
    pub fn queries(&self) -> Vec<String> {
        self.state.queries.lock().unwrap().clone()
    }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/cas/v1/api-key", post(issue_tgt))
        .route("/cas/v1/api-key/:tgt", post(issue_service_ticket))
        .route("/rest/search", get(search))
        .route("/rest/broken", get(broken))
        .route("/rest/plain", get(plain))
        .with_state(state)
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn record_auth(
    state: &MockState,
    path: String,
    headers: &HeaderMap,
    form: HashMap<String, String>,
) {
    state.auth_requests.lock().unwrap().push(RecordedAuthRequest {
        path,
        content_type: header_value(headers, header::CONTENT_TYPE),
        accept: header_value(headers, header::ACCEPT),
        user_agent: header_value(headers, header::USER_AGENT),
        form,
    });
}

fn tgt_page(action: &str) -> String {
    format!(
        concat!(
            r#"<!DOCTYPE HTML PUBLIC "-//IETF//DTD HTML 2.0//EN">"#,
            "<html><head><title>201 Created</title></head>\n",
            r#"<body><h1>TGT Created</h1><form action="{}" method="POST">"#,
            r#"Service:<input type="text" name="service" value=""><br>"#,
            r#"<input type="submit" value="Submit"></form></body></html>"#,
        ),
        action
    )
}

async fn issue_tgt(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.tgt_posts.fetch_add(1, Ordering::SeqCst);
    let api_key = form.get("apikey").cloned().unwrap_or_default();
    record_auth(&state, "/cas/v1/api-key".to_string(), &headers, form);

    match api_key.as_str() {
        GOOD_KEY => (
            StatusCode::CREATED,
            Html(tgt_page(&format!("{}/cas/v1/api-key/TGT-good", state.base_url))),
        )
            .into_response(),
        EXPIRED_KEY => (
            StatusCode::CREATED,
            Html(tgt_page(&format!("{}/cas/v1/api-key/TGT-expired", state.base_url))),
        )
            .into_response(),
        RELATIVE_KEY => (
            StatusCode::CREATED,
            Html(tgt_page("/cas/v1/api-key/TGT-relative")),
        )
            .into_response(),
        NO_FORM_KEY => (
            StatusCode::OK,
            Html("<html><body><h1>Welcome</h1><p>Nothing to see.</p></body></html>".to_string()),
        )
            .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Html("<html><body><h1>401 Unauthorized</h1></body></html>".to_string()),
        )
            .into_response(),
    }
}

async fn issue_service_ticket(
    State(state): State<Arc<MockState>>,
    Path(tgt): Path<String>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.ticket_posts.fetch_add(1, Ordering::SeqCst);
    let service = form.get("service").cloned().unwrap_or_default();
    record_auth(&state, format!("/cas/v1/api-key/{}", tgt), &headers, form);

    if tgt == "TGT-expired" {
        return (StatusCode::NOT_FOUND, "TGT-expired could not be found").into_response();
    }
    if service != SERVICE_ID {
        return (StatusCode::BAD_REQUEST, "unknown service").into_response();
    }
    (StatusCode::OK, SERVICE_TICKET).into_response()
}

async fn search(
    State(state): State<Arc<MockState>>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.queries.lock().unwrap().push(raw.unwrap_or_default());

    match params.get("ticket").map(String::as_str) {
        Some(SERVICE_TICKET) => Json(json!({"result": 42})).into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn broken(State(state): State<Arc<MockState>>, RawQuery(raw): RawQuery) -> Response {
    state.queries.lock().unwrap().push(raw.unwrap_or_default());
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn plain(State(state): State<Arc<MockState>>, RawQuery(raw): RawQuery) -> Response {
    state.queries.lock().unwrap().push(raw.unwrap_or_default());
    (StatusCode::OK, "this is not json").into_response()
}
