//! Pure projections from loaded entities to the external JSON contract
//!
//! Formatters never load anything and never fail: not-found and invalid
//! identifiers are handled upstream by the pipeline stages. Given the same
//! entity they produce the same JSON, which is what makes repeated lookups
//! byte-identical.

use crate::core::{Alias, Entity, EntityType, Identifier, Relationship};
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

/// Alias as exposed by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasInfo {
    pub name: String,
    pub sort_name: String,
    pub alias_language: Option<String>,
    pub primary: bool,
}

impl From<&Alias> for AliasInfo {
    fn from(alias: &Alias) -> Self {
        Self {
            name: alias.name.clone(),
            sort_name: alias.sort_name.clone(),
            alias_language: alias.language.clone(),
            primary: alias.primary,
        }
    }
}

/// Basic-info projection of an entity: the flattened default alias plus the
/// scalar attributes. Served by the detail endpoint and embedded in browse
/// envelopes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub bbid: Uuid,
    pub default_alias: Option<AliasInfo>,
    pub disambiguation: Option<String>,
    /// The entity's sub-type tag ("Person", "Group", "Novel", ...)
    #[serde(rename = "type")]
    pub sub_type: Option<String>,
    pub gender: Option<String>,
    pub begin_area: Option<String>,
    pub begin_date: Option<String>,
    pub end_area: Option<String>,
    pub end_date: Option<String>,
    pub ended: bool,
}

/// Identifier as exposed by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifierInfo {
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
}

impl From<&Identifier> for IdentifierInfo {
    fn from(identifier: &Identifier) -> Self {
        Self {
            type_name: identifier.type_name.clone(),
            value: identifier.value.clone(),
        }
    }
}

/// A relationship viewed from one of its endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipInfo {
    pub id: Uuid,
    /// "outgoing" when the viewing entity is the source, "incoming" otherwise
    pub direction: &'static str,
    pub linked_entity_bbid: Uuid,
    pub relationship_type_id: i32,
    pub relationship_type: String,
}

/// Envelope for the alias-list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasesResponse {
    pub bbid: Uuid,
    pub aliases: Vec<AliasInfo>,
}

/// Envelope for the identifier-list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifiersResponse {
    pub bbid: Uuid,
    pub identifiers: Vec<IdentifierInfo>,
}

/// Envelope for the relationship-list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipsResponse {
    pub bbid: Uuid,
    pub relationships: Vec<RelationshipInfo>,
}

/// One related entity in a browse envelope, paired with the relationships
/// connecting it to the seed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedEntry {
    pub entity: BasicInfo,
    pub relationships: Vec<RelationshipInfo>,
}

/// Envelope for browse responses: the seed's BBID plus one keyed list of
/// related entities ("relatedAuthors", "relatedWorks", ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseResponse {
    pub bbid: Uuid,
    #[serde(flatten)]
    pub related: IndexMap<&'static str, Vec<RelatedEntry>>,
}

/// Project an entity to its basic info
pub fn basic_info(entity: &Entity) -> BasicInfo {
    BasicInfo {
        bbid: entity.bbid,
        default_alias: entity.default_alias.as_ref().map(AliasInfo::from),
        disambiguation: entity.disambiguation.clone(),
        sub_type: entity.sub_type.clone(),
        gender: entity.gender.clone(),
        begin_area: entity.begin_area.clone(),
        begin_date: entity.begin_date.clone(),
        end_area: entity.end_area.clone(),
        end_date: entity.end_date.clone(),
        ended: entity.ended,
    }
}

/// Project an entity's alias list
pub fn alias_list(entity: &Entity) -> AliasesResponse {
    AliasesResponse {
        bbid: entity.bbid,
        aliases: entity.aliases.iter().map(AliasInfo::from).collect(),
    }
}

/// Project an entity's identifier list
pub fn identifier_list(entity: &Entity) -> IdentifiersResponse {
    IdentifiersResponse {
        bbid: entity.bbid,
        identifiers: entity.identifiers.iter().map(IdentifierInfo::from).collect(),
    }
}

/// Project an entity's relationship list, viewed from the entity itself
pub fn relationship_list(entity: &Entity) -> RelationshipsResponse {
    RelationshipsResponse {
        bbid: entity.bbid,
        relationships: entity
            .relationships
            .iter()
            .map(|rel| relationship_info(rel, &entity.bbid))
            .collect(),
    }
}

fn relationship_info(rel: &Relationship, viewpoint: &Uuid) -> RelationshipInfo {
    let (direction, linked) = if &rel.source_bbid == viewpoint {
        ("outgoing", rel.target_bbid)
    } else {
        ("incoming", rel.source_bbid)
    };
    RelationshipInfo {
        id: rel.id,
        direction,
        linked_entity_bbid: linked,
        relationship_type_id: rel.type_id,
        relationship_type: rel.label.clone(),
    }
}

/// Whether an entity's sub-type matches an optional case-insensitive filter.
///
/// No filter accepts everything; an entity with no sub-type only matches
/// when no filter is given.
pub fn matches_type_filter(entity: &Entity, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(wanted) => entity
            .sub_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(wanted)),
    }
}

/// Build a browse envelope from the seed and its related entities.
///
/// `related` pairs each loaded related entity with the seed relationships
/// that reached it, in the seed's relationship order. Entities failing the
/// type filter are dropped; an empty result is an empty list, not an error.
pub fn browse_envelope(
    target: EntityType,
    seed: &Entity,
    related: Vec<(Entity, Vec<Relationship>)>,
    type_filter: Option<&str>,
) -> BrowseResponse {
    let entries: Vec<RelatedEntry> = related
        .into_iter()
        .filter(|(entity, _)| matches_type_filter(entity, type_filter))
        .map(|(entity, rels)| RelatedEntry {
            entity: basic_info(&entity),
            relationships: rels
                .iter()
                .map(|rel| relationship_info(rel, &seed.bbid))
                .collect(),
        })
        .collect();

    let mut related = IndexMap::new();
    related.insert(target.related_key(), entries);

    BrowseResponse {
        bbid: seed.bbid,
        related,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Alias;

    fn author(sub_type: Option<&str>) -> Entity {
        let mut entity = Entity::new(Uuid::new_v4(), EntityType::Author)
            .with_default_alias("Test Author", "Author, Test");
        entity.sub_type = sub_type.map(String::from);
        entity
    }

    #[test]
    fn test_basic_info_flattens_default_alias() {
        let entity = author(Some("Person"));
        let info = basic_info(&entity);

        assert_eq!(info.bbid, entity.bbid);
        assert_eq!(info.default_alias.unwrap().name, "Test Author");
        assert_eq!(info.sub_type.as_deref(), Some("Person"));
    }

    #[test]
    fn test_basic_info_serializes_to_camel_case() {
        let mut entity = author(Some("Person"));
        entity.begin_date = Some("1929-10-21".to_string());

        let json = serde_json::to_value(basic_info(&entity)).unwrap();
        assert_eq!(json["type"], "Person");
        assert_eq!(json["beginDate"], "1929-10-21");
        assert_eq!(json["defaultAlias"]["sortName"], "Author, Test");
        assert_eq!(json["ended"], false);
    }

    #[test]
    fn test_identifier_projection_renames_type() {
        let entity = author(None).with_identifier("ISNI", "0000 0000 8399 0270");
        let json = serde_json::to_value(identifier_list(&entity)).unwrap();

        assert_eq!(json["identifiers"][0]["type"], "ISNI");
        assert_eq!(json["identifiers"][0]["value"], "0000 0000 8399 0270");
    }

    #[test]
    fn test_alias_list_projection() {
        let entity = author(None).with_alias(Alias {
            name: "Pen Name".to_string(),
            sort_name: "Name, Pen".to_string(),
            language: Some("English".to_string()),
            primary: false,
        });

        let projected = alias_list(&entity);
        assert_eq!(projected.aliases.len(), 1);
        assert_eq!(projected.aliases[0].alias_language.as_deref(), Some("English"));
    }

    #[test]
    fn test_relationship_direction_depends_on_viewpoint() {
        let author_bbid = Uuid::new_v4();
        let work_bbid = Uuid::new_v4();
        let rel = Relationship::new(8, "Author", author_bbid, work_bbid);

        let mut entity = Entity::new(author_bbid, EntityType::Author);
        entity.relationships.push(rel.clone());
        let from_author = relationship_list(&entity);
        assert_eq!(from_author.relationships[0].direction, "outgoing");
        assert_eq!(from_author.relationships[0].linked_entity_bbid, work_bbid);

        let mut entity = Entity::new(work_bbid, EntityType::Work);
        entity.relationships.push(rel);
        let from_work = relationship_list(&entity);
        assert_eq!(from_work.relationships[0].direction, "incoming");
        assert_eq!(from_work.relationships[0].linked_entity_bbid, author_bbid);
    }

    #[test]
    fn test_type_filter_is_case_insensitive() {
        let person = author(Some("Person"));
        assert!(matches_type_filter(&person, Some("person")));
        assert!(matches_type_filter(&person, Some("PERSON")));
        assert!(!matches_type_filter(&person, Some("group")));
        assert!(matches_type_filter(&person, None));
    }

    #[test]
    fn test_untyped_entity_matches_only_without_filter() {
        let untyped = author(None);
        assert!(matches_type_filter(&untyped, None));
        assert!(!matches_type_filter(&untyped, Some("person")));
    }

    #[test]
    fn test_browse_envelope_filters_and_keys_by_target() {
        let seed = Entity::new(Uuid::new_v4(), EntityType::Work);
        let person = author(Some("Person"));
        let group = author(Some("Group"));

        let person_rel = Relationship::new(8, "Author", person.bbid, seed.bbid);
        let group_rel = Relationship::new(8, "Author", group.bbid, seed.bbid);

        let envelope = browse_envelope(
            EntityType::Author,
            &seed,
            vec![(person.clone(), vec![person_rel]), (group, vec![group_rel])],
            Some("person"),
        );

        let entries = &envelope.related["relatedAuthors"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity.bbid, person.bbid);
        assert_eq!(entries[0].relationships[0].linked_entity_bbid, person.bbid);
    }

    #[test]
    fn test_browse_envelope_empty_result_is_empty_list() {
        let seed = Entity::new(Uuid::new_v4(), EntityType::Work);

        let envelope = browse_envelope(EntityType::Author, &seed, vec![], Some("person"));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["bbid"], seed.bbid.to_string());
        assert_eq!(json["relatedAuthors"], serde_json::json!([]));
    }
}
