use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while turning a thread URL into a
/// [`CleanedThread`](crate::thread::CleanedThread). The `Display` text is
/// what the endpoint returns in its `error` field.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("URL is required")]
    InputMissing,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The request never produced a response (connect error, timeout, body read).
    #[error("Failed to reach Reddit: {0}")]
    UpstreamTransport(#[source] reqwest::Error),

    #[error("Reddit returned {status}: {status_text}")]
    UpstreamHttp { status: u16, status_text: String },

    #[error("Reddit returned an empty response. Please try again.")]
    EmptyUpstreamResponse,

    #[error("Reddit blocked the request. Try again in a few seconds.")]
    UpstreamBlocked,

    #[error("Reddit returned an unexpected response. The post may not be accessible.")]
    UnexpectedFormat,

    #[error("This Reddit post could not be found. It may have been deleted or made private.")]
    ThreadNotFound,

    #[error("Failed to parse Reddit response: {preview}...")]
    JsonParse { preview: String },

    #[error("Invalid Reddit data structure. Please ensure this is a valid thread URL.")]
    InvalidStructure,
}

impl ScrapeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InputMissing => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
