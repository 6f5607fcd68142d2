//! Concrete request stages: the entity loader, the browse query validator
//! and the browse-mode relationship loader

use crate::core::{ApiError, CatalogueStore, EntityType, Relation, parse_bbid};
use crate::pipeline::{BrowseSeed, RequestContext, Stage};
use async_trait::async_trait;

/// Loads the entity named by the request's BBID path parameter.
///
/// On success the fully-loaded entity, with the requested relations
/// materialized, is attached to the context. A malformed identifier is an
/// invalid-identifier condition (406); a well-formed identifier matching
/// nothing is reported as not-found (404) using the supplied message.
pub struct EntityLoader {
    /// Restrict the lookup to this type; None accepts any entity
    entity_type: Option<EntityType>,
    relations: Vec<Relation>,
    not_found_message: String,
}

impl EntityLoader {
    pub fn new(
        entity_type: Option<EntityType>,
        relations: Vec<Relation>,
        not_found_message: impl Into<String>,
    ) -> Self {
        Self {
            entity_type,
            relations,
            not_found_message: not_found_message.into(),
        }
    }

    /// Loader for a lookup endpoint of `target`, with the conventional
    /// "{Type} not found" message
    pub fn for_target(target: EntityType, relations: Vec<Relation>) -> Self {
        Self::new(
            Some(target),
            relations,
            format!("{} not found", target.as_str()),
        )
    }
}

#[async_trait]
impl Stage for EntityLoader {
    fn name(&self) -> &'static str {
        "entity_loader"
    }

    async fn apply(
        &self,
        store: &dyn CatalogueStore,
        mut ctx: RequestContext,
    ) -> Result<RequestContext, ApiError> {
        let raw = ctx.raw_bbid.as_deref().ok_or_else(|| {
            ApiError::Internal("entity loader ran without a path identifier".to_string())
        })?;
        let bbid = parse_bbid(raw)?;

        let entity = store
            .fetch_entity(&bbid, self.entity_type, &self.relations)
            .await?
            .ok_or_else(|| ApiError::NotFound {
                message: self.not_found_message.clone(),
            })?;

        ctx.entity = Some(entity);
        Ok(ctx)
    }
}

/// Query parameters a browse request may use to name its seed entity.
///
/// Order is fixed so error messages and ambiguity reports are stable.
pub const BROWSE_SEED_PARAMS: [EntityType; 4] = [
    EntityType::Author,
    EntityType::Edition,
    EntityType::EditionGroup,
    EntityType::Work,
];

/// Checks that a browse request names exactly one seed entity.
///
/// The query string must contain exactly one recognized entity-reference
/// parameter with a well-formed BBID value; zero, several, or a malformed
/// value all fail with 406. Unrecognized parameters (such as the `type`
/// filter) are ignored here and read by the terminal handler.
#[derive(Default)]
pub struct BrowseQueryValidator;

#[async_trait]
impl Stage for BrowseQueryValidator {
    fn name(&self) -> &'static str {
        "browse_query_validator"
    }

    async fn apply(
        &self,
        _store: &dyn CatalogueStore,
        mut ctx: RequestContext,
    ) -> Result<RequestContext, ApiError> {
        let present: Vec<EntityType> = BROWSE_SEED_PARAMS
            .into_iter()
            .filter(|kind| ctx.query.contains_key(kind.url_name()))
            .collect();

        let kind = match present.as_slice() {
            [kind] => *kind,
            [] => {
                return Err(ApiError::InvalidBrowseRequest {
                    message: format!(
                        "exactly one of {} is required",
                        seed_param_names().join(", ")
                    ),
                });
            }
            many => {
                let named: Vec<&str> = many.iter().map(|k| k.url_name()).collect();
                return Err(ApiError::InvalidBrowseRequest {
                    message: format!(
                        "only one seed entity may be given, got: {}",
                        named.join(", ")
                    ),
                });
            }
        };

        // contains_key above guarantees the entry exists
        let raw = ctx.query[kind.url_name()].clone();
        let bbid = parse_bbid(&raw)?;

        ctx.seed = Some(BrowseSeed { kind, bbid });
        Ok(ctx)
    }
}

fn seed_param_names() -> Vec<&'static str> {
    BROWSE_SEED_PARAMS.iter().map(|k| k.url_name()).collect()
}

/// Resolves the validated seed reference and loads its relationship set.
///
/// The seed must actually be of the type named by the query parameter:
/// `?work=` pointing at an Author BBID is a 404, the same as an unknown
/// BBID. On success the seed entity and its relationships land in the
/// context for the terminal handler to filter and project.
pub struct BrowsedRelationshipLoader;

#[async_trait]
impl Stage for BrowsedRelationshipLoader {
    fn name(&self) -> &'static str {
        "browsed_relationship_loader"
    }

    async fn apply(
        &self,
        store: &dyn CatalogueStore,
        mut ctx: RequestContext,
    ) -> Result<RequestContext, ApiError> {
        let seed = ctx.seed.ok_or_else(|| {
            ApiError::Internal("relationship loader ran before browse validation".to_string())
        })?;

        let entity = store
            .fetch_entity(
                &seed.bbid,
                Some(seed.kind),
                &[Relation::DefaultAlias, Relation::Relationships],
            )
            .await?
            .ok_or_else(|| ApiError::NotFound {
                message: format!("{} not found", seed.kind.as_str()),
            })?;

        ctx.relationships = entity.relationships.clone();
        ctx.entity = Some(entity);
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Entity;
    use crate::storage::InMemoryCatalogue;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_loader_attaches_entity() {
        let store = InMemoryCatalogue::new();
        let bbid = Uuid::new_v4();
        store.insert(Entity::new(bbid, EntityType::Author).with_default_alias("A", "A"));

        let loader = EntityLoader::for_target(EntityType::Author, vec![Relation::DefaultAlias]);
        let ctx = loader
            .apply(&store, RequestContext::for_lookup(bbid.to_string()))
            .await
            .unwrap();

        assert_eq!(ctx.entity.unwrap().bbid, bbid);
    }

    #[tokio::test]
    async fn test_loader_rejects_malformed_bbid() {
        let store = InMemoryCatalogue::new();
        let loader = EntityLoader::for_target(EntityType::Author, vec![]);

        let err = loader
            .apply(&store, RequestContext::for_lookup("not-a-bbid"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidIdentifier { .. }));
    }

    #[tokio::test]
    async fn test_loader_reports_not_found_with_supplied_message() {
        let store = InMemoryCatalogue::new();
        let loader = EntityLoader::new(Some(EntityType::Work), vec![], "Work not found");

        let err = loader
            .apply(&store, RequestContext::for_lookup(Uuid::new_v4().to_string()))
            .await
            .unwrap_err();

        match err {
            ApiError::NotFound { message } => assert_eq!(message, "Work not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_loader_treats_wrong_type_as_absent() {
        let store = InMemoryCatalogue::new();
        let bbid = Uuid::new_v4();
        store.insert(Entity::new(bbid, EntityType::Work));

        let loader = EntityLoader::for_target(EntityType::Author, vec![]);
        let err = loader
            .apply(&store, RequestContext::for_lookup(bbid.to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_validator_accepts_single_seed_param() {
        let store = InMemoryCatalogue::new();
        let bbid = Uuid::new_v4();

        let ctx = BrowseQueryValidator
            .apply(
                &store,
                RequestContext::for_browse(query(&[
                    ("work", &bbid.to_string()),
                    ("type", "person"),
                ])),
            )
            .await
            .unwrap();

        let seed = ctx.seed.unwrap();
        assert_eq!(seed.kind, EntityType::Work);
        assert_eq!(seed.bbid, bbid);
    }

    #[tokio::test]
    async fn test_validator_rejects_zero_seed_params() {
        let store = InMemoryCatalogue::new();

        let err = BrowseQueryValidator
            .apply(&store, RequestContext::for_browse(query(&[("type", "person")])))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidBrowseRequest { .. }));
    }

    #[tokio::test]
    async fn test_validator_rejects_multiple_seed_params() {
        let store = InMemoryCatalogue::new();
        let a = Uuid::new_v4().to_string();
        let b = Uuid::new_v4().to_string();

        let err = BrowseQueryValidator
            .apply(
                &store,
                RequestContext::for_browse(query(&[("work", &a), ("edition", &b)])),
            )
            .await
            .unwrap_err();

        match err {
            ApiError::InvalidBrowseRequest { message } => {
                assert!(message.contains("edition"));
                assert!(message.contains("work"));
            }
            other => panic!("expected InvalidBrowseRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validator_rejects_malformed_seed_value() {
        let store = InMemoryCatalogue::new();

        let err = BrowseQueryValidator
            .apply(
                &store,
                RequestContext::for_browse(query(&[("author", "not-a-bbid")])),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidIdentifier { .. }));
    }

    #[tokio::test]
    async fn test_relationship_loader_requires_existing_seed() {
        let store = InMemoryCatalogue::new();
        let mut ctx = RequestContext::default();
        ctx.seed = Some(BrowseSeed {
            kind: EntityType::Work,
            bbid: Uuid::new_v4(),
        });

        let err = BrowsedRelationshipLoader
            .apply(&store, ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_relationship_loader_populates_context() {
        use crate::core::Relationship;

        let store = InMemoryCatalogue::new();
        let work = Uuid::new_v4();
        let author = Uuid::new_v4();
        store.insert(
            Entity::new(work, EntityType::Work)
                .with_relationship(Relationship::new(8, "Author", author, work)),
        );

        let mut ctx = RequestContext::default();
        ctx.seed = Some(BrowseSeed {
            kind: EntityType::Work,
            bbid: work,
        });

        let ctx = BrowsedRelationshipLoader.apply(&store, ctx).await.unwrap();

        assert_eq!(ctx.relationships.len(), 1);
        assert_eq!(ctx.entity.unwrap().bbid, work);
    }
}
