use anyhow::{Context, Result};
use clap::Parser;
use imagegen_server::{app::App, models::Config, server};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "imagegen-server")]
#[command(about = "Serve the image generation and chat backend")]
struct CliArgs {
    /// Port to listen on; overrides PORT.
    #[arg(long)]
    port: Option<u16>,

    /// Directory generated images are written to; overrides IMAGE_OUTPUT_DIR.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagegen_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(output_dir) = args.output_dir {
        config.image_output_dir = output_dir;
    }

    let app = Arc::new(App::from_config(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Backend server running on http://localhost:{}", config.port);

    server::serve(listener, app).await?;
    Ok(())
}
