use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};

use crate::config::FetchConfig;
use crate::error::ScrapeError;

pub const MAX_ATTEMPTS: u32 = 2;

const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// The last response received from Reddit, body already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub status_text: String,
    pub body: String,
    pub attempts: u32,
}

impl FetchedPage {
    /// Non-empty and not HTML. This is a shape sniff only; the body may
    /// still fail to parse.
    pub fn looks_like_data(&self) -> bool {
        !self.body.is_empty() && !self.body.trim_start().starts_with('<')
    }
}

/// GETs `url` up to [`MAX_ATTEMPTS`] times, retrying once after
/// `config.retry_delay` when the body is empty or HTML. The last response is
/// returned whatever it contains; judging it is the validator's job.
pub async fn fetch_with_retry(
    client: &reqwest::Client,
    config: &FetchConfig,
    url: &str,
) -> Result<FetchedPage, ScrapeError> {
    let mut attempt = 1;
    loop {
        let page = fetch_once(client, config, url, attempt).await?;
        if page.looks_like_data() || attempt >= MAX_ATTEMPTS {
            return Ok(page);
        }

        tracing::warn!(
            url,
            attempt,
            status = page.status,
            delay_ms = config.retry_delay.as_millis() as u64,
            "reddit returned an empty or html body; retrying"
        );
        tokio::time::sleep(config.retry_delay).await;
        attempt += 1;
    }
}

async fn fetch_once(
    client: &reqwest::Client,
    config: &FetchConfig,
    url: &str,
    attempt: u32,
) -> Result<FetchedPage, ScrapeError> {
    let response = client
        .get(url)
        .header(USER_AGENT, config.user_agent.as_str())
        .header(ACCEPT, ACCEPT_VALUE)
        .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await
        .map_err(ScrapeError::UpstreamTransport)?;

    let status = response.status();
    let status_text = reason_phrase(&response);
    let body = response
        .text()
        .await
        .map_err(ScrapeError::UpstreamTransport)?;

    tracing::debug!(url, attempt, status = status.as_u16(), bytes = body.len(), "fetched");

    Ok(FetchedPage {
        status: status.as_u16(),
        status_text,
        body,
        attempts: attempt,
    })
}

/// The reason phrase Reddit sent. hyper only keeps it when it differs from
/// the canonical one, so fall back to that.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<hyper::ext::ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_owned(),
    }
}
