use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::FetchConfig;
use crate::error::ScrapeError;
use crate::scrape::scrape_thread;
use crate::thread::CleanedThread;

#[derive(Clone)]
pub struct AppState {
    client: reqwest::Client,
    config: Arc<FetchConfig>,
}

impl AppState {
    pub fn new(config: FetchConfig) -> reqwest::Result<Self> {
        let client = config.http_client()?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ScrapeRequest {
    #[serde(default)]
    url: Option<serde_json::Value>,
}

/// `{success: true, data}`, shared by the endpoint and `fetch`.
#[derive(Debug, Serialize)]
pub struct ScrapeSuccess {
    pub success: bool,
    pub data: CleanedThread,
}

impl ScrapeSuccess {
    pub fn new(data: CleanedThread) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Every path is handled the same way; the method decides what happens.
/// CORS headers go on every response, errors included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(handle)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn handle(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    match method {
        Method::OPTIONS => StatusCode::OK.into_response(),
        Method::POST => match scrape(&state, &body).await {
            Ok(data) => Json(ScrapeSuccess::new(data)).into_response(),
            Err(err) => {
                if err.status().is_server_error() {
                    tracing::error!(error = %err, "scrape failed");
                } else {
                    tracing::info!(error = %err, "rejected scrape request");
                }
                err.into_response()
            }
        },
        _ => ScrapeError::MethodNotAllowed.into_response(),
    }
}

async fn scrape(state: &AppState, body: &[u8]) -> Result<CleanedThread, ScrapeError> {
    let url = requested_url(body).ok_or(ScrapeError::InputMissing)?;
    scrape_thread(&state.client, &state.config, &url).await
}

/// The `url` field when it is a non-empty string. A body that is not a JSON
/// object counts as missing the field.
fn requested_url(body: &[u8]) -> Option<String> {
    let request: ScrapeRequest = serde_json::from_slice(body).ok()?;
    match request.url? {
        serde_json::Value::String(url) if !url.trim().is_empty() => Some(url),
        _ => None,
    }
}
