//! Core module containing the entity model, error taxonomy and store trait

pub mod entity;
pub mod error;
pub mod store;

pub use entity::{Alias, Entity, EntityType, Identifier, Relationship, parse_bbid};
pub use error::{ApiError, ApiResult, ConfigError, ErrorResponse};
pub use store::{CatalogueStore, Relation};
