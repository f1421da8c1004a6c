use std::{net::SocketAddr, process::exit, sync::Arc, time::Instant};

use headway::{
    blob::{AzureBlobSource, BlobSource, LocalBlobSource, ZipBlobSource},
    dataset::Dataset,
    gtfs::Gtfs,
};
use headway_server::{
    api,
    config::{FeedSource, ServerConfig},
    state::AppState,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Startup is deliberately single-threaded: the feed loads to completion
/// and the dataset is installed before the runtime and listener exist, so
/// the server never answers from a half-loaded state.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err}");
            exit(1);
        }
    };

    let source: Box<dyn BlobSource> = match &config.source {
        FeedSource::Cloud { account, container } => {
            info!(account = %account, container = %container, "loading feed from blob container");
            match AzureBlobSource::connect(account, container) {
                Ok(source) => Box::new(source),
                Err(err) => {
                    error!("failed to connect to blob container: {err}");
                    exit(1);
                }
            }
        }
        FeedSource::Local { path } if path.extension().is_some_and(|ext| ext == "zip") => {
            info!(path = %path.display(), "loading feed from zip archive");
            match ZipBlobSource::open_path(path) {
                Ok(source) => Box::new(source),
                Err(err) => {
                    error!("failed to open feed archive: {err}");
                    exit(1);
                }
            }
        }
        FeedSource::Local { path } => {
            if !path.is_dir() {
                error!(path = %path.display(), "feed directory does not exist");
                exit(1);
            }
            info!(path = %path.display(), "loading feed from directory");
            Box::new(LocalBlobSource::new(path.clone()))
        }
    };

    let start = Instant::now();
    let dataset = match Dataset::new().with_gtfs(&Gtfs::new(source)) {
        Ok(dataset) => dataset,
        Err(err) => {
            error!("failed to load feed: {err}");
            exit(1);
        }
    };
    let counts = dataset.counts();
    info!(
        elapsed = ?start.elapsed(),
        trips = counts.trips,
        stop_times = counts.stop_times,
        "feed loaded"
    );

    let state = Arc::new(AppState::new());
    state.install(dataset);
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to start runtime: {err}");
            exit(1);
        }
    };
    let served = runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("listening on {addr}");
        axum::serve(listener, app).await
    });
    if let Err(err) = served {
        error!("server error: {err}");
        exit(1);
    }
}
