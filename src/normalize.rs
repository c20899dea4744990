use url::Url;

const JSON_SUFFIX: &str = ".json";

/// Turns a thread URL into the URL of its JSON representation.
///
/// Never fails: input the `url` crate rejects (for example a URL without a
/// scheme) goes through plain string surgery instead.
pub fn normalize_thread_url(input: &str, mirror_host: Option<&str>) -> String {
    let input = input.trim();
    match Url::parse(input) {
        Ok(url) => normalize_parsed(url, mirror_host).to_string(),
        Err(err) => {
            tracing::debug!(%err, input, "thread url did not parse; using string fallback");
            normalize_fallback(input, mirror_host)
        }
    }
}

fn normalize_parsed(mut url: Url, mirror_host: Option<&str>) -> Url {
    url.set_query(None);
    url.set_fragment(None);

    let path = with_json_suffix(url.path());
    url.set_path(&path);

    if let Some(mirror) = mirror_host {
        if is_reddit_host(&url) && url.set_host(Some(mirror)).is_err() {
            tracing::debug!(mirror, "mirror host rejected; keeping original host");
        }
    }

    url
}

fn normalize_fallback(input: &str, mirror_host: Option<&str>) -> String {
    let end = input.find(['?', '#']).unwrap_or(input.len());
    let mut out = input[..end].to_owned();

    if let Some(mirror) = mirror_host {
        out = out.replace("www.reddit.com", mirror);
    }

    with_json_suffix(&out)
}

fn with_json_suffix(path: &str) -> String {
    if path.ends_with(JSON_SUFFIX) {
        return path.to_owned();
    }
    format!("{}{JSON_SUFFIX}", path.trim_end_matches('/'))
}

fn is_reddit_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        let host = host.to_ascii_lowercase();
        host == "reddit.com" || host.ends_with(".reddit.com")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIRROR: Option<&str> = Some("old.reddit.com");

    #[test]
    fn strips_query_and_trailing_slash_then_appends_suffix() {
        let out = normalize_thread_url(
            "https://www.reddit.com/r/rust/comments/abc123/some_title/?utm_source=share&ref=x",
            MIRROR,
        );
        assert_eq!(
            out,
            "https://old.reddit.com/r/rust/comments/abc123/some_title.json"
        );
    }

    #[test]
    fn existing_suffix_is_not_duplicated() {
        let out = normalize_thread_url(
            "https://old.reddit.com/r/rust/comments/abc123/t.json?x=1",
            MIRROR,
        );
        assert_eq!(out, "https://old.reddit.com/r/rust/comments/abc123/t.json");
        assert_eq!(out.matches(".json").count(), 1);
    }

    #[test]
    fn repeated_trailing_slashes_are_all_removed() {
        let out = normalize_thread_url("https://reddit.com/r/rust/comments/abc//", None);
        assert_eq!(out, "https://reddit.com/r/rust/comments/abc.json");
    }

    #[test]
    fn fragment_is_dropped() {
        let out = normalize_thread_url("https://www.reddit.com/r/a/comments/b/c/#top", MIRROR);
        assert_eq!(out, "https://old.reddit.com/r/a/comments/b/c.json");
    }

    #[test]
    fn non_reddit_hosts_keep_their_host() {
        let out = normalize_thread_url("http://127.0.0.1:9000/r/a/comments/b/?q=1", MIRROR);
        assert_eq!(out, "http://127.0.0.1:9000/r/a/comments/b.json");
    }

    #[test]
    fn mirror_can_be_disabled() {
        let out = normalize_thread_url("https://www.reddit.com/r/a/comments/b/", None);
        assert_eq!(out, "https://www.reddit.com/r/a/comments/b.json");
    }

    #[test]
    fn unparseable_input_uses_string_fallback() {
        let out = normalize_thread_url("www.reddit.com/r/a/comments/b/?utm=1", MIRROR);
        assert_eq!(out, "old.reddit.com/r/a/comments/b.json");

        let out = normalize_thread_url("not a url/", None);
        assert_eq!(out, "not a url.json");
    }

    #[test]
    fn fallback_keeps_existing_suffix() {
        let out = normalize_thread_url("reddit.com/r/a/comments/b.json?x", None);
        assert_eq!(out, "reddit.com/r/a/comments/b.json");
    }
}
