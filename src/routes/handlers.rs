//! HTTP handlers for lookup and browse endpoints
//!
//! Handlers are entity-agnostic: the same five handlers serve every exposed
//! entity type, parameterized by the target type carried in [`AppState`].
//! Each handler builds the stage pipeline for its endpoint, runs it, and
//! projects the populated context with a pure formatter.

use axum::Json;
use axum::extract::{Path, Query, State};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{ApiError, CatalogueStore, Entity, EntityType, Relation, Relationship};
use crate::pipeline::{
    BrowseQueryValidator, BrowsedRelationshipLoader, EntityLoader, Pipeline, RequestContext,
};
use crate::routes::formatters::{
    self, AliasesResponse, BasicInfo, BrowseResponse, IdentifiersResponse, RelationshipsResponse,
};

/// State shared by one entity type's route table
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogueStore>,
    /// The entity type this route table looks up and browses for
    pub target: EntityType,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogueStore>, target: EntityType) -> Self {
        Self { store, target }
    }
}

async fn run_lookup(
    state: &AppState,
    raw_bbid: String,
    relations: Vec<Relation>,
) -> Result<RequestContext, ApiError> {
    Pipeline::new()
        .then(EntityLoader::for_target(state.target, relations))
        .run(state.store.as_ref(), RequestContext::for_lookup(raw_bbid))
        .await
}

/// GET /{type}/{bbid}
pub async fn detail(
    State(state): State<AppState>,
    Path(bbid): Path<String>,
) -> Result<Json<BasicInfo>, ApiError> {
    let ctx = run_lookup(&state, bbid, vec![Relation::DefaultAlias]).await?;
    Ok(Json(formatters::basic_info(ctx.entity()?)))
}

/// GET /{type}/{bbid}/aliases
pub async fn aliases(
    State(state): State<AppState>,
    Path(bbid): Path<String>,
) -> Result<Json<AliasesResponse>, ApiError> {
    let ctx = run_lookup(&state, bbid, vec![Relation::Aliases]).await?;
    Ok(Json(formatters::alias_list(ctx.entity()?)))
}

/// GET /{type}/{bbid}/identifiers
pub async fn identifiers(
    State(state): State<AppState>,
    Path(bbid): Path<String>,
) -> Result<Json<IdentifiersResponse>, ApiError> {
    let ctx = run_lookup(&state, bbid, vec![Relation::Identifiers]).await?;
    Ok(Json(formatters::identifier_list(ctx.entity()?)))
}

/// GET /{type}/{bbid}/relationships
pub async fn relationships(
    State(state): State<AppState>,
    Path(bbid): Path<String>,
) -> Result<Json<RelationshipsResponse>, ApiError> {
    let ctx = run_lookup(&state, bbid, vec![Relation::Relationships]).await?;
    Ok(Json(formatters::relationship_list(ctx.entity()?)))
}

/// GET /{type}?{seed-kind}={bbid}&type={filter}
///
/// Finds entities of the target type related to the seed entity named by
/// exactly one of the recognized query parameters.
pub async fn browse(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<BrowseResponse>, ApiError> {
    let type_filter = params.get("type").cloned();

    let ctx = Pipeline::new()
        .then(BrowseQueryValidator)
        .then(BrowsedRelationshipLoader)
        .run(state.store.as_ref(), RequestContext::for_browse(params))
        .await?;

    let seed = ctx.entity()?;
    let related = related_entities(&state, seed, &ctx.relationships).await?;

    Ok(Json(formatters::browse_envelope(
        state.target,
        seed,
        related,
        type_filter.as_deref(),
    )))
}

/// Resolve the seed's relationships to loaded entities of the target type,
/// pairing each with the relationships that reached it. First-seen order of
/// the seed's relationship list is preserved so responses are deterministic.
async fn related_entities(
    state: &AppState,
    seed: &Entity,
    relationships: &[Relationship],
) -> Result<Vec<(Entity, Vec<Relationship>)>, ApiError> {
    let mut grouped: indexmap::IndexMap<uuid::Uuid, (Entity, Vec<Relationship>)> =
        indexmap::IndexMap::new();

    for rel in relationships {
        let Some(other_bbid) = rel.other_endpoint(&seed.bbid) else {
            continue;
        };

        if let Some((_, rels)) = grouped.get_mut(&other_bbid) {
            rels.push(rel.clone());
            continue;
        }

        // Relationships pointing at entities of other types are simply not
        // part of this browse result.
        let fetched = state
            .store
            .fetch_entity(&other_bbid, Some(state.target), &[Relation::DefaultAlias])
            .await?;
        if let Some(entity) = fetched {
            grouped.insert(other_bbid, (entity, vec![rel.clone()]));
        }
    }

    Ok(grouped.into_values().collect())
}
