//! Route-table construction for lookup and browse endpoints

pub mod formatters;
pub mod handlers;

pub use handlers::AppState;

use crate::core::{CatalogueStore, EntityType};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Build the lookup and browse routes for one target entity type.
///
/// Routes for `EntityType::Author`:
/// - GET /author — browse authors related to a seed entity
/// - GET /author/{bbid} — basic info
/// - GET /author/{bbid}/aliases
/// - GET /author/{bbid}/identifiers
/// - GET /author/{bbid}/relationships
///
/// The returned router is a plain value; callers merge it into the
/// application at startup.
pub fn entity_routes(target: EntityType, store: Arc<dyn CatalogueStore>) -> Router {
    let state = AppState::new(store, target);
    let segment = target.url_name();

    Router::new()
        .route(&format!("/{segment}"), get(handlers::browse))
        .route(&format!("/{segment}/{{bbid}}"), get(handlers::detail))
        .route(
            &format!("/{segment}/{{bbid}}/aliases"),
            get(handlers::aliases),
        )
        .route(
            &format!("/{segment}/{{bbid}}/identifiers"),
            get(handlers::identifiers),
        )
        .route(
            &format!("/{segment}/{{bbid}}/relationships"),
            get(handlers::relationships),
        )
        .with_state(state)
}
