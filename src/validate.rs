use serde::Deserialize as _;
use serde_json::Value;

use crate::error::ScrapeError;
use crate::thread::{RawThreadPayload, dismantle};

const PREVIEW_CHARS: usize = 100;

/// Phrases Reddit puts in plain-text (non-JSON) replies for missing threads.
const MISSING_PHRASES: &[&str] = &["page not found", "not found", "the page", "not available"];

/// Narrower set for HTML bodies; "the page" appears on almost every page.
const MISSING_HTML_PHRASES: &[&str] = &["page not found", "not found", "not available"];

/// Checks a fetched body and parses it into the two thread listings.
pub fn validate_response(
    status: u16,
    status_text: &str,
    body: &str,
) -> Result<RawThreadPayload, ScrapeError> {
    if !(200..300).contains(&status) {
        return Err(ScrapeError::UpstreamHttp {
            status,
            status_text: status_text.to_owned(),
        });
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ScrapeError::EmptyUpstreamResponse);
    }

    if trimmed.starts_with('<') || body.contains("<!DOCTYPE") {
        if mentions_any(trimmed, MISSING_HTML_PHRASES) {
            return Err(ScrapeError::ThreadNotFound);
        }
        return Err(ScrapeError::UpstreamBlocked);
    }

    if !trimmed.starts_with('[') && !trimmed.starts_with('{') {
        if mentions_any(trimmed, MISSING_PHRASES) {
            return Err(ScrapeError::ThreadNotFound);
        }
        return Err(ScrapeError::UnexpectedFormat);
    }

    let parsed = parse_unbounded(body).map_err(|err| {
        tracing::debug!(%err, "reddit body is not valid json");
        ScrapeError::JsonParse {
            preview: body.chars().take(PREVIEW_CHARS).collect(),
        }
    })?;

    match parsed {
        Value::Array(elements) if elements.len() >= 2 => {
            Ok(RawThreadPayload::from_elements(elements))
        }
        other => {
            dismantle(other);
            Err(ScrapeError::InvalidStructure)
        }
    }
}

/// Parses without serde_json's 128-level nesting limit. Every comment level
/// costs five levels of JSON, so the limit would reject threads past ~25
/// replies deep; serde_stacker moves the recursion onto heap-allocated stack
/// segments instead.
fn parse_unbounded(body: &str) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_str(body);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

fn mentions_any(text: &str, phrases: &[&str]) -> bool {
    let lower = text.to_lowercase();
    phrases.iter().any(|phrase| lower.contains(phrase))
}
