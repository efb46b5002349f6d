use std::sync::Arc;

use anyhow::Result;
use careers_client::{CmsArgs, CmsClient};
use careers_server::{AppState, app};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI arguments for the careers server.
#[derive(Parser, Debug)]
#[command(name = "careers-server", about = "Serve the careers, blog and contact API")]
struct Args {
    #[command(flatten)]
    cms: CmsArgs,

    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, env = "CAREERS_LISTEN", default_value = "127.0.0.1:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("careers_server=info,careers_client=info,tower_http=debug")
        }))
        .with_target(false)
        .init();

    let args = Args::parse();
    info!("🚀 Starting careers server...");

    let cms = CmsClient::new(args.cms.to_config()?)?;
    info!("📡 Using CMS at {}", cms.base_url());

    let state = Arc::new(AppState { cms });
    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    info!("🌐 Server running at http://{}", args.listen);
    info!("   Try: curl 'http://{}/careers?q=engineer'", args.listen);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
