//! Bibliographic entity model shared by the store, the pipeline and the formatters

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::core::error::ApiError;

/// The kinds of bibliographic entity the catalogue serves.
///
/// CRITICAL: the *sub*-type of an entity (e.g. "Person" vs "Group" for an
/// author) is a plain string on [`Entity`], not part of this enum, so new
/// sub-types never require a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Author,
    Work,
    Edition,
    EditionGroup,
}

impl EntityType {
    /// Display name used in error messages and the `entityType` field
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Author => "Author",
            EntityType::Work => "Work",
            EntityType::Edition => "Edition",
            EntityType::EditionGroup => "EditionGroup",
        }
    }

    /// URL spelling: the path segment of this type's route table and the
    /// browse query parameter naming a seed of this type
    ///
    /// Example: "edition-group" → `/edition-group/{bbid}` and `?edition-group=`
    pub fn url_name(&self) -> &'static str {
        match self {
            EntityType::Author => "author",
            EntityType::Work => "work",
            EntityType::Edition => "edition",
            EntityType::EditionGroup => "edition-group",
        }
    }

    /// Resolve a browse query-parameter name back to an entity type
    pub fn from_url_name(name: &str) -> Option<Self> {
        match name {
            "author" => Some(EntityType::Author),
            "work" => Some(EntityType::Work),
            "edition" => Some(EntityType::Edition),
            "edition-group" => Some(EntityType::EditionGroup),
            _ => None,
        }
    }

    /// Envelope key for browse responses targeting this type
    ///
    /// Example: "relatedAuthors" → `{"bbid": ..., "relatedAuthors": [...]}`
    pub fn related_key(&self) -> &'static str {
        match self {
            EntityType::Author => "relatedAuthors",
            EntityType::Work => "relatedWorks",
            EntityType::Edition => "relatedEditions",
            EntityType::EditionGroup => "relatedEditionGroups",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a BBID-shaped path or query value.
///
/// A malformed value is an invalid-identifier condition (HTTP 406), not a
/// generic parse failure.
pub fn parse_bbid(value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| ApiError::InvalidIdentifier {
        value: value.to_string(),
    })
}

/// A name variant of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub sort_name: String,

    /// Language of the alias (e.g. "English"); None when unknown
    #[serde(default)]
    pub language: Option<String>,

    /// Whether this alias is a primary name for the entity
    #[serde(default)]
    pub primary: bool,
}

/// An external-system identifier attached to an entity
/// (e.g. a library catalog number or an ISNI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    /// Name of the identifier scheme (e.g. "ISNI", "VIAF")
    pub type_name: String,
    pub value: String,
}

/// A typed, directed association between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: Uuid,

    /// Numeric relationship-type identifier from the catalogue's type table
    pub type_id: i32,

    /// Display label for the relationship type (e.g. "Author", "Illustrator")
    pub label: String,

    pub source_bbid: Uuid,
    pub target_bbid: Uuid,
}

impl Relationship {
    pub fn new(type_id: i32, label: impl Into<String>, source_bbid: Uuid, target_bbid: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_id,
            label: label.into(),
            source_bbid,
            target_bbid,
        }
    }

    /// The BBID on the far side of this relationship from `bbid`,
    /// or None when `bbid` is not an endpoint
    pub fn other_endpoint(&self, bbid: &Uuid) -> Option<Uuid> {
        if &self.source_bbid == bbid {
            Some(self.target_bbid)
        } else if &self.target_bbid == bbid {
            Some(self.source_bbid)
        } else {
            None
        }
    }
}

/// A catalogued bibliographic entity.
///
/// Entities are read-only in this service: the store owns them and the
/// pipeline only projects them. Every entity has a non-null BBID.
///
/// The scalar attributes cover all entity kinds; fields that do not apply
/// to a kind (e.g. `gender` on a Work) are simply None. Begin/end dates are
/// kept as partial calendar strings ("1907" or "1907-07-07") exactly as the
/// catalogue records them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub bbid: Uuid,
    pub entity_type: EntityType,

    #[serde(default)]
    pub default_alias: Option<Alias>,

    /// Comment distinguishing this entity from similarly named ones
    #[serde(default)]
    pub disambiguation: Option<String>,

    /// Sub-type tag within the entity kind ("Person", "Group", "Novel", ...)
    #[serde(default)]
    pub sub_type: Option<String>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub begin_area: Option<String>,

    #[serde(default)]
    pub end_area: Option<String>,

    #[serde(default)]
    pub begin_date: Option<String>,

    #[serde(default)]
    pub end_date: Option<String>,

    /// Whether the entity has ended (died, dissolved, gone out of print)
    #[serde(default)]
    pub ended: bool,

    #[serde(default)]
    pub aliases: Vec<Alias>,

    #[serde(default)]
    pub identifiers: Vec<Identifier>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Entity {
    /// Create a minimal entity with only its identity fields set
    pub fn new(bbid: Uuid, entity_type: EntityType) -> Self {
        Self {
            bbid,
            entity_type,
            default_alias: None,
            disambiguation: None,
            sub_type: None,
            gender: None,
            begin_area: None,
            end_area: None,
            begin_date: None,
            end_date: None,
            ended: false,
            aliases: Vec::new(),
            identifiers: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn with_default_alias(mut self, name: impl Into<String>, sort_name: impl Into<String>) -> Self {
        self.default_alias = Some(Alias {
            name: name.into(),
            sort_name: sort_name.into(),
            language: None,
            primary: true,
        });
        self
    }

    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }

    pub fn with_alias(mut self, alias: Alias) -> Self {
        self.aliases.push(alias);
        self
    }

    pub fn with_identifier(mut self, type_name: impl Into<String>, value: impl Into<String>) -> Self {
        self.identifiers.push(Identifier {
            type_name: type_name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }
}
