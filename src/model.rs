//! The data-model registry: entities, fields and relationships.
//!
//! The registry replaces attribute reflection on ORM classes with an
//! explicit mapping from canonical (snake_case) names to typed
//! descriptors. It is built once at startup, in code via the fluent
//! `EntityDef` methods or from JSON via [`crate::config`], and treated
//! as immutable afterwards, so concurrent query builds may share it
//! freely.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::OdataError;

/// Declared semantic type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Boolean,
    Date,
    DateTime,
}

/// How a relationship is wired up in the storage schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Many-to-one: the foreign key lives on the source row.
    BelongsTo { local_key: String },
    /// One-to-many: the foreign key lives on the target row.
    HasMany { remote_key: String },
    /// Many-to-many through a junction table. `local_key` and
    /// `remote_key` are the junction columns pointing at the source and
    /// target primary keys respectively.
    ManyToMany {
        junction_table: String,
        local_key: String,
        remote_key: String,
    },
}

/// A named hop from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Registry name of the target entity.
    pub target: String,
    pub kind: RelationKind,
}

fn default_key() -> String {
    "id".to_string()
}

/// One entity: its backing table, primary key, scalar fields and
/// relationships, all keyed by canonical snake_case name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Registry name, e.g. `User`. Filled in from the map key on load.
    #[serde(skip)]
    pub name: String,
    pub table: String,
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default)]
    pub fields: HashMap<String, FieldType>,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
}

impl EntityDef {
    pub fn new(table: &str) -> Self {
        Self {
            name: String::new(),
            table: table.to_string(),
            key: default_key(),
            fields: HashMap::new(),
            relationships: HashMap::new(),
        }
    }

    pub fn key(mut self, column: &str) -> Self {
        self.key = column.to_string();
        self
    }

    pub fn field(mut self, name: &str, ty: FieldType) -> Self {
        self.fields.insert(name.to_string(), ty);
        self
    }

    pub fn belongs_to(mut self, name: &str, target: &str, local_key: &str) -> Self {
        self.relationships.insert(
            name.to_string(),
            Relationship {
                target: target.to_string(),
                kind: RelationKind::BelongsTo {
                    local_key: local_key.to_string(),
                },
            },
        );
        self
    }

    pub fn has_many(mut self, name: &str, target: &str, remote_key: &str) -> Self {
        self.relationships.insert(
            name.to_string(),
            Relationship {
                target: target.to_string(),
                kind: RelationKind::HasMany {
                    remote_key: remote_key.to_string(),
                },
            },
        );
        self
    }

    pub fn many_to_many(
        mut self,
        name: &str,
        target: &str,
        junction_table: &str,
        local_key: &str,
        remote_key: &str,
    ) -> Self {
        self.relationships.insert(
            name.to_string(),
            Relationship {
                target: target.to_string(),
                kind: RelationKind::ManyToMany {
                    junction_table: junction_table.to_string(),
                    local_key: local_key.to_string(),
                    remote_key: remote_key.to_string(),
                },
            },
        );
        self
    }
}

/// All entities known to the query builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelRegistry {
    entities: HashMap<String, EntityDef>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from named entity definitions.
    pub fn with_entities(entities: impl IntoIterator<Item = (&'static str, EntityDef)>) -> Self {
        let mut registry = Self::new();
        for (name, entity) in entities {
            registry.register(name, entity);
        }
        registry
    }

    pub fn register(&mut self, name: &str, mut entity: EntityDef) {
        entity.name = name.to_string();
        self.entities.insert(name.to_string(), entity);
    }

    pub fn entity(&self, name: &str) -> Result<&EntityDef, OdataError> {
        self.entities
            .get(name)
            .ok_or_else(|| OdataError::UnknownEntity(name.to_string()))
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.values()
    }
}
