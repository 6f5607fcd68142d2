//! In-memory implementation of CatalogueStore for testing and development

use crate::core::{CatalogueStore, Entity, EntityType, Relation};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory catalogue store.
///
/// Useful for testing and for running the service against a fixture file.
/// Uses RwLock for thread-safe access; entities are stored fully loaded and
/// the requested-relations contract is honored by pruning on the way out.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogue {
    entities: Arc<RwLock<HashMap<Uuid, Entity>>>,
}

impl InMemoryCatalogue {
    /// Create a new, empty in-memory catalogue
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace an entity.
    ///
    /// Seeding helper for fixtures and tests; the serving path goes
    /// through [`CatalogueStore::fetch_entity`], which reports lock
    /// failures as errors instead.
    ///
    /// # Panics
    ///
    /// Panics if the entity map lock was poisoned by a panic in another
    /// thread.
    pub fn insert(&self, entity: Entity) {
        self.entities
            .write()
            .expect("entity map lock poisoned")
            .insert(entity.bbid, entity);
    }

    /// Number of entities currently held
    ///
    /// # Panics
    ///
    /// Panics if the entity map lock was poisoned by a panic in another
    /// thread.
    pub fn len(&self) -> usize {
        self.entities.read().expect("entity map lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load a catalogue from a YAML fixture file: a list of entities in the
    /// [`Entity`] serde shape
    pub fn from_fixture_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture file '{}'", path))?;
        Self::from_fixture_str(&content)
            .with_context(|| format!("failed to parse fixture file '{}'", path))
    }

    /// Load a catalogue from a YAML fixture string
    pub fn from_fixture_str(yaml: &str) -> Result<Self> {
        let entities: Vec<Entity> = serde_yaml::from_str(yaml)?;
        let store = Self::new();
        for entity in entities {
            store.insert(entity);
        }
        Ok(store)
    }
}

#[async_trait]
impl CatalogueStore for InMemoryCatalogue {
    async fn fetch_entity(
        &self,
        bbid: &Uuid,
        entity_type: Option<EntityType>,
        relations: &[Relation],
    ) -> Result<Option<Entity>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let Some(entity) = entities.get(bbid) else {
            return Ok(None);
        };

        if entity_type.is_some_and(|t| t != entity.entity_type) {
            return Ok(None);
        }

        let mut entity = entity.clone();
        if !relations.contains(&Relation::DefaultAlias) {
            entity.default_alias = None;
        }
        if !relations.contains(&Relation::Aliases) {
            entity.aliases.clear();
        }
        if !relations.contains(&Relation::Identifiers) {
            entity.identifiers.clear();
        }
        if !relations.contains(&Relation::Relationships) {
            entity.relationships.clear();
        }

        Ok(Some(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Relationship;

    fn sample_author(bbid: Uuid) -> Entity {
        Entity::new(bbid, EntityType::Author)
            .with_default_alias("Ursula K. Le Guin", "Le Guin, Ursula K.")
            .with_sub_type("Person")
            .with_identifier("VIAF", "66462036")
    }

    #[tokio::test]
    async fn test_fetch_returns_inserted_entity() {
        let store = InMemoryCatalogue::new();
        let bbid = Uuid::new_v4();
        store.insert(sample_author(bbid));

        let fetched = store
            .fetch_entity(&bbid, Some(EntityType::Author), &[Relation::DefaultAlias])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched.bbid, bbid);
        assert_eq!(fetched.default_alias.unwrap().name, "Ursula K. Le Guin");
    }

    #[tokio::test]
    async fn test_fetch_unknown_bbid_is_none() {
        let store = InMemoryCatalogue::new();

        let fetched = store
            .fetch_entity(&Uuid::new_v4(), None, &[])
            .await
            .unwrap();

        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_fetch_with_type_restriction() {
        let store = InMemoryCatalogue::new();
        let bbid = Uuid::new_v4();
        store.insert(sample_author(bbid));

        let as_work = store
            .fetch_entity(&bbid, Some(EntityType::Work), &[])
            .await
            .unwrap();
        assert!(as_work.is_none());

        let any_type = store.fetch_entity(&bbid, None, &[]).await.unwrap();
        assert!(any_type.is_some());
    }

    #[tokio::test]
    async fn test_only_requested_relations_are_materialized() {
        let store = InMemoryCatalogue::new();
        let bbid = Uuid::new_v4();
        let other = Uuid::new_v4();
        store.insert(
            sample_author(bbid)
                .with_relationship(Relationship::new(8, "Author", bbid, other)),
        );

        let fetched = store
            .fetch_entity(&bbid, None, &[Relation::Identifiers])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched.identifiers.len(), 1);
        assert!(fetched.default_alias.is_none());
        assert!(fetched.aliases.is_empty());
        assert!(fetched.relationships.is_empty());
    }

    #[tokio::test]
    async fn test_fixture_loading() {
        let yaml = r#"
- bbid: f94d74ce-c748-4130-8d59-38b290af8af3
  entity_type: Work
  default_alias:
    name: Harry Potter
    sort_name: Harry Potter
  sub_type: Novel
- bbid: 2e5f49a8-6a38-4cc7-97c7-8e624e1fc2c1
  entity_type: Author
  sub_type: Person
"#;

        let store = InMemoryCatalogue::from_fixture_str(yaml).unwrap();
        assert_eq!(store.len(), 2);

        let work_bbid = Uuid::parse_str("f94d74ce-c748-4130-8d59-38b290af8af3").unwrap();
        let work = store
            .fetch_entity(&work_bbid, Some(EntityType::Work), &[Relation::DefaultAlias])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(work.default_alias.unwrap().name, "Harry Potter");
    }

    #[test]
    fn test_fixture_file_loading() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "- bbid: {}\n  entity_type: Author",
            Uuid::new_v4()
        )
        .unwrap();

        let store = InMemoryCatalogue::from_fixture_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fixture_file_missing_is_an_error() {
        let err = InMemoryCatalogue::from_fixture_file("/does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("/does/not/exist.yaml"));
    }
}
