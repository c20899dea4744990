use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset: our own events plus the per-request spans
/// `TraceLayer` emits, everything else at `warn`.
pub const DEFAULT_FILTER: &str = "warn,threadclean=info,tower_http=info";

/// Installs the global `tracing` subscriber on stderr, so `fetch` keeps
/// stdout for the JSON document.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
