//! `json-items` binary: load config, open the store, serve HTTP.

use clap::Parser;
use json_items::config::{load_config, validate_config, ConfigError};
use json_items::{AccessMode, FileStore, HttpServer, Items, ServiceConfig, StatusPolicy};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "json-items")]
#[command(about = "Serve a JSON array file as a CRUD collection at /items")]
struct Args {
    /// TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `store.path`.
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Override `store.access` (serialized | unsynchronized).
    #[arg(long)]
    access: Option<AccessMode>,

    /// Override `responses.status_policy` (compatible | normalized).
    #[arg(long)]
    status_policy: Option<StatusPolicy>,
}

impl Args {
    fn into_config(self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServiceConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(path) = self.data_file {
            config.store.path = path;
        }
        if let Some(access) = self.access {
            config.store.access = access;
        }
        if let Some(policy) = self.status_policy {
            config.responses.status_policy = policy;
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.observability.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        store = %config.store.path.display(),
        access = ?config.store.access,
        status_policy = ?config.responses.status_policy,
        "Configuration loaded"
    );

    let store = FileStore::builder(&config.store.path)
        .pretty(config.store.pretty)
        .atomic_writes(config.store.atomic_writes)
        .create_if_missing(config.store.create_if_missing)
        .build()?;
    let items = Items::new(store)
        .with_access(config.store.access)
        .with_status_policy(config.responses.status_policy);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(config, items).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
