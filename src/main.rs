use axum::Router;
use clap::Parser;
use geocloud_rust::api::{self, AppState};
use geocloud_rust::config::PipelineConfig;
use geocloud_rust::corpus::{join_labels, load_corpus, AccountLabels};
use geocloud_rust::engine::GeoCloudEngine;
use geocloud_rust::gazetteer::Gazetteer;
use geocloud_rust::lexicon::Lexicon;
use geocloud_rust::store::{InMemoryStore, TweetStore};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "geocloud-rust")]
#[command(about = "GeoCloud Rust Engine - geo-tagged word clouds for Florida hazard discourse")]
struct Args {
    /// Server port
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Directory with gazetteer.csv / lexicon.yaml overriding the bundled data
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Tweet documents (JSON array or JSON lines)
    #[arg(short, long)]
    tweets: Option<PathBuf>,

    /// Corpus CSV files for the single-term cloud (repeatable)
    #[arg(long)]
    corpus: Vec<PathBuf>,

    /// Labeled-account CSV files, joined in order (repeatable)
    #[arg(long)]
    labels: Vec<PathBuf>,

    /// Pipeline configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip lemmatization in the term ranking
    #[arg(long)]
    no_lemmatize: bool,
}

fn load_gazetteer(data_dir: Option<&Path>) -> Result<Gazetteer, Box<dyn std::error::Error>> {
    if let Some(path) = data_dir.map(|d| d.join("gazetteer.csv")).filter(|p| p.exists()) {
        match Gazetteer::load(&path) {
            Ok(gazetteer) => return Ok(gazetteer),
            Err(e) => warn!("Failed to load {:?}: {}, using bundled gazetteer", path, e),
        }
    }
    Ok(Gazetteer::bundled()?)
}

fn load_lexicon(data_dir: Option<&Path>) -> Result<Lexicon, Box<dyn std::error::Error>> {
    if let Some(path) = data_dir.map(|d| d.join("lexicon.yaml")).filter(|p| p.exists()) {
        match Lexicon::load(&path) {
            Ok(lexicon) => return Ok(lexicon),
            Err(e) => warn!("Failed to load {:?}: {}, using bundled lexicon", path, e),
        }
    }
    Ok(Lexicon::bundled()?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("GeoCloud Rust Engine");

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path).unwrap_or_else(|e| {
            warn!("Failed to load config {:?}: {}, using defaults", path, e);
            PipelineConfig::default()
        }),
        None => PipelineConfig::default(),
    };
    if args.no_lemmatize {
        config.lemmatize = false;
    }

    let data_dir = args.data_dir.as_deref();
    let engine = Arc::new(GeoCloudEngine::new(
        load_gazetteer(data_dir)?,
        load_lexicon(data_dir)?,
        config,
    )?);

    let store: Arc<dyn TweetStore> = match &args.tweets {
        Some(path) => match InMemoryStore::load(path) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!("Failed to load tweets: {}, starting with an empty store", e);
                Arc::new(InMemoryStore::default())
            }
        },
        None => {
            info!("No tweet store configured, starting empty");
            Arc::new(InMemoryStore::default())
        }
    };

    let labels = AccountLabels::load_all(&args.labels);
    let corpus = join_labels(load_corpus(&args.corpus), &labels);
    info!(
        "Corpus: {} records, {} labeled accounts",
        corpus.len(),
        labels.len()
    );

    let app = Router::new()
        .merge(api::routes(AppState::new(engine, store, corpus)))
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
