use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    threadclean::logging::init().context("init logging")?;

    let cli = threadclean::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        threadclean::cli::Command::Serve(args) => serve(args).await.context("serve")?,
        threadclean::cli::Command::Fetch(args) => fetch(args).await.context("fetch")?,
    }

    Ok(())
}

async fn serve(args: threadclean::cli::ServeArgs) -> anyhow::Result<()> {
    let config = args.upstream.to_config().with_env_overrides();
    tracing::info!(?config, "starting threadclean server");

    let state = threadclean::server::AppState::new(config).context("build http client")?;
    let app = threadclean::server::router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn fetch(args: threadclean::cli::FetchArgs) -> anyhow::Result<()> {
    let config = args.upstream.to_config().with_env_overrides();
    let client = config.http_client().context("build http client")?;

    let thread = threadclean::scrape::scrape_thread(&client, &config, &args.url)
        .await
        .with_context(|| format!("scrape {}", args.url))?;

    let document = threadclean::server::ScrapeSuccess::new(thread);
    let out = if args.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .context("serialize cleaned thread")?;
    println!("{out}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
