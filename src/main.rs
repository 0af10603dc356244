use clap::Parser;
use neurochat::args::Args;
use neurochat::{AppState, ChatServer, GeminiFactory, browser, logger, serve, shutdown_signal};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.request_timeout_secs))
        .build()?;
    let factory = Arc::new(GeminiFactory::new(http, &args.api_base_url, &args.model));
    tracing::info!(model = %args.model, "using Gemini model");

    let state = Arc::new(AppState::load(&args.state_paths(), factory).await);
    let server = Arc::new(ChatServer::new(state, &args.static_root));

    let addr = args.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    if args.open_browser {
        browser::open_later(format!("http://{addr}"), Duration::from_millis(1500));
    }
    serve(server, listener, shutdown_signal()).await
}
