use crate::config::FetchConfig;
use crate::error::ScrapeError;
use crate::fetch::fetch_with_retry;
use crate::normalize::normalize_thread_url;
use crate::thread::{CleanedThread, clean_thread};
use crate::validate::validate_response;

/// Runs the whole pipeline for one thread URL: normalize, fetch, validate,
/// clean. Either the full thread or an error; never a partial result.
pub async fn scrape_thread(
    client: &reqwest::Client,
    config: &FetchConfig,
    thread_url: &str,
) -> Result<CleanedThread, ScrapeError> {
    let json_url = normalize_thread_url(thread_url, config.mirror_host.as_deref());
    tracing::info!(input = thread_url, url = %json_url, "scraping thread");

    let page = fetch_with_retry(client, config, &json_url).await?;
    let payload = validate_response(page.status, &page.status_text, &page.body)?;
    let thread = clean_thread(&payload);

    tracing::info!(
        url = %json_url,
        attempts = page.attempts,
        comments = thread.comments.len(),
        "thread cleaned"
    );
    Ok(thread)
}
