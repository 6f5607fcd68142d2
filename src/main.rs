//! bibcat service binary: load config, seed the store, serve

use bibcat::config::ServiceConfig;
use bibcat::core::EntityType;
use bibcat::server::ServerBuilder;
use bibcat::storage::InMemoryCatalogue;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bibcat=info,tower_http=info")),
        )
        .init();

    let config = match std::env::var("BIBCAT_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            ServiceConfig::from_yaml_file(&path)?
        }
        Err(_) => ServiceConfig::default(),
    };

    let store = match &config.fixtures {
        Some(path) => {
            let store = InMemoryCatalogue::from_fixture_file(path)?;
            tracing::info!("Seeded {} entities from {}", store.len(), path);
            store
        }
        None => InMemoryCatalogue::new(),
    };

    ServerBuilder::new()
        .with_store(store)
        .expose(EntityType::Author)
        .expose(EntityType::Work)
        .serve(&config.bind_addr())
        .await
}
