//! Explicit request pipeline: an ordered list of stages over a typed context
//!
//! Every endpoint request is a strict linear sequence
//!
//! ```text
//! validate (browse only) → load entity → load browsed relationships
//! (browse only) → format → respond
//! ```
//!
//! with no retries and no loops. The sequence is explicit data: a
//! [`Pipeline`] holds an ordered list of [`Stage`] values, each mapping a
//! [`RequestContext`] to an updated context or an [`ApiError`], and the
//! runner short-circuits on the first failure. Handlers build a pipeline,
//! run it, and hand the populated context to a pure formatter.
//!
//! The context is exclusively owned by its originating request and dropped
//! at response end; the store handle is the only shared resource.

pub mod stages;

use crate::core::{ApiError, CatalogueStore, Entity, EntityType, Relationship};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

pub use stages::{BrowseQueryValidator, BrowsedRelationshipLoader, EntityLoader};

/// The seed entity reference recognized by the browse query validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseSeed {
    /// Which query parameter named the seed (and therefore its entity type)
    pub kind: EntityType,
    pub bbid: Uuid,
}

/// Per-request scratch state threaded through the stages.
///
/// Created at request start, populated incrementally by each stage, and
/// consumed by the terminal formatter. Fields start unset and only the
/// stages named in their docs fill them in.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Raw identifier from the request path, before validation
    pub raw_bbid: Option<String>,

    /// Raw query parameters, before validation
    pub query: HashMap<String, String>,

    /// Set by [`BrowseQueryValidator`]
    pub seed: Option<BrowseSeed>,

    /// Set by [`EntityLoader`] (lookup) or [`BrowsedRelationshipLoader`] (browse)
    pub entity: Option<Entity>,

    /// Set by [`BrowsedRelationshipLoader`]: the seed entity's relationships
    pub relationships: Vec<Relationship>,
}

impl RequestContext {
    /// Context for a lookup request carrying a BBID path parameter
    pub fn for_lookup(raw_bbid: impl Into<String>) -> Self {
        Self {
            raw_bbid: Some(raw_bbid.into()),
            ..Self::default()
        }
    }

    /// Context for a browse request carrying a query string
    pub fn for_browse(query: HashMap<String, String>) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    /// The loaded entity, which every terminal formatter needs.
    ///
    /// A missing entity after a successful pipeline run is a stage-ordering
    /// bug, not a user error.
    pub fn entity(&self) -> Result<&Entity, ApiError> {
        self.entity
            .as_ref()
            .ok_or_else(|| ApiError::Internal("pipeline finished without loading an entity".to_string()))
    }
}

/// One step of the request pipeline.
///
/// A stage either returns the context with more fields populated or an
/// error that becomes the response; it never partially responds itself.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stage name for failure logs
    fn name(&self) -> &'static str;

    async fn apply(
        &self,
        store: &dyn CatalogueStore,
        ctx: RequestContext,
    ) -> Result<RequestContext, ApiError>;
}

/// An ordered list of stages run against a single request context
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage to the end of the pipeline
    pub fn then(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run every stage in order, short-circuiting on the first error
    pub async fn run(
        &self,
        store: &dyn CatalogueStore,
        mut ctx: RequestContext,
    ) -> Result<RequestContext, ApiError> {
        for stage in &self.stages {
            ctx = match stage.apply(store, ctx).await {
                Ok(next) => next,
                Err(err) => {
                    tracing::debug!(stage = stage.name(), error = %err, "request stage failed");
                    return Err(err);
                }
            };
        }
        Ok(ctx)
    }
}
