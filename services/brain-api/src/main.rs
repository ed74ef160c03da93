//! Brain source-estimate animation service.
//!
//! Serves a single-page UI for uploading MNE source estimates and turns
//! them into looping GIFs of cortical activity rendered on the fsaverage
//! surfaces.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use brain_api::fetch::SurfaceFetcher;
use brain_api::state::{AppState, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "brain-api")]
#[command(about = "Brain activity GIF generation server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8090", env = "BRAIN_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "BRAIN_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Directory holding the fsaverage surface files
    #[arg(long, default_value = "./data/fsaverage", env = "BRAIN_SURFACE_DIR")]
    surface_dir: PathBuf,

    /// Base URL to fetch missing surface files from at startup
    #[arg(long, env = "BRAIN_SURFACE_BASE_URL")]
    surface_base_url: Option<String>,

    /// TrueType font for frame annotations (system fonts are tried otherwise)
    #[arg(long, env = "BRAIN_FONT_PATH")]
    font_path: Option<PathBuf>,

    /// Maximum upload size in bytes
    #[arg(long, default_value_t = 64 * 1024 * 1024, env = "BRAIN_MAX_UPLOAD_BYTES")]
    max_upload_bytes: usize,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }
    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .json()
        .init();

    info!("Starting brain animation server");

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    if let Some(base_url) = &args.surface_base_url {
        let fetcher = SurfaceFetcher::new(base_url.clone(), args.surface_dir.clone())?;
        if let Err(e) = fetcher.fetch_missing().await {
            warn!(error = %e, "Surface fetch incomplete; /ready will report not-ready");
        }
    }

    let config = ServiceConfig {
        surface_dir: args.surface_dir,
        font_path: args.font_path,
        max_upload_bytes: args.max_upload_bytes,
    };
    let state = Arc::new(AppState::new(config, prometheus_handle));
    state.warm_surfaces().await;

    let app = brain_api::router(state);

    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
