//! # bibcat
//!
//! A read-only lookup and relationship-browse JSON API for bibliographic
//! entities (authors, works, editions, edition groups).
//!
//! ## Features
//!
//! - **Lookup endpoints**: basic info, aliases, identifiers and
//!   relationships for any catalogued entity, addressed by BBID
//! - **Browse endpoints**: find entities related to a seed entity named by
//!   a single query parameter, with optional sub-type filtering
//! - **Explicit request pipeline**: each endpoint is an ordered list of
//!   request stages over a typed context, run by a single pipeline runner
//! - **Entity-agnostic handlers**: one set of handlers serves every exposed
//!   entity type
//! - **Pluggable storage**: a store trait with an in-memory implementation
//!   and YAML fixture loading
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bibcat::prelude::*;
//!
//! let store = InMemoryCatalogue::from_fixture_file("catalogue.yaml")?;
//!
//! ServerBuilder::new()
//!     .with_store(store)
//!     .expose(EntityType::Author)
//!     .expose(EntityType::Work)
//!     .serve("127.0.0.1:9098")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod pipeline;
pub mod routes;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Alias, ApiError, ApiResult, CatalogueStore, Entity, EntityType, Identifier, Relation,
        Relationship, parse_bbid,
    };

    // === Pipeline ===
    pub use crate::pipeline::{
        BrowseQueryValidator, BrowsedRelationshipLoader, EntityLoader, Pipeline, RequestContext,
        Stage,
    };

    // === Routes ===
    pub use crate::routes::{AppState, entity_routes};

    // === Storage ===
    pub use crate::storage::InMemoryCatalogue;

    // === Config ===
    pub use crate::config::ServiceConfig;

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
