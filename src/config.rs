use std::time::Duration;

pub const DEFAULT_MIRROR_HOST: &str = "old.reddit.com";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; RedditScraper/1.0; +https://github.com)";

/// Overrides `--mirror-host`; an empty value disables the rewrite.
pub const MIRROR_HOST_ENV: &str = "THREADCLEAN_MIRROR_HOST";

/// Upstream settings shared by every request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub mirror_host: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mirror_host: Some(DEFAULT_MIRROR_HOST.to_owned()),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(15),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl FetchConfig {
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var(MIRROR_HOST_ENV) {
            self.mirror_host = mirror_host_from_env(&value);
        }
        self
    }

    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
    }
}

fn mirror_host_from_env(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
