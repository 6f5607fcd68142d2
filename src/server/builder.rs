//! ServerBuilder for fluent API to build the HTTP application

use crate::core::{CatalogueStore, EntityType};
use crate::routes::entity_routes;
use anyhow::{Result, anyhow};
use axum::{Json, Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the catalogue HTTP application
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryCatalogue::new())
///     .expose(EntityType::Author)
///     .expose(EntityType::Work)
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn CatalogueStore>>,
    targets: Vec<EntityType>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            targets: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the catalogue store (required)
    pub fn with_store(mut self, store: impl CatalogueStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Expose the lookup and browse route table for an entity type
    pub fn expose(mut self, target: EntityType) -> Self {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    /// Add custom routes to the server, for endpoints outside the
    /// lookup/browse pattern
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the application router.
    ///
    /// This is a pure value construction: nothing binds or listens, and no
    /// module-load side effects are involved, so tests can drive the router
    /// directly.
    pub fn build(self) -> Result<Router> {
        let store = self
            .store
            .ok_or_else(|| anyhow!("a catalogue store is required, call with_store()"))?;
        if self.targets.is_empty() {
            return Err(anyhow!(
                "no entity routes exposed, call expose() at least once"
            ));
        }

        let mut app = Router::new().route("/health", get(health));

        for target in &self.targets {
            app = app.merge(entity_routes(*target, store.clone()));
        }
        for routes in self.custom_routes {
            app = app.merge(routes);
        }

        // Public read-only API: trace every request, allow any origin
        Ok(app
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        }
    }
}
