//! Loads the data-model registry from a JSON configuration file.
//!
//! The file is a flattened map from entity name to definition:
//!
//! ```json
//! {
//!     "User": {
//!         "table": "users",
//!         "fields": { "id": "integer", "username": "string" },
//!         "relationships": {
//!             "supervisor": {
//!                 "target": "User",
//!                 "kind": { "belongs_to": { "local_key": "supervisor_id" } }
//!             }
//!         }
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{EntityDef, ModelRegistry};

/// On-disk shape of the model registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub entities: HashMap<String, EntityDef>,
}

impl ModelConfig {
    /// Load entity definitions from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("model config file does not exist: {}", path.display());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("unable to read model config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("unable to parse model config {}", path.display()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("unable to parse model config")
    }

    /// Turn the raw definitions into a registry with entity names wired
    /// up.
    pub fn into_registry(self) -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        for (name, entity) in self.entities {
            registry.register(&name, entity);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, RelationKind};
    use std::io::Write;

    const MODEL_JSON: &str = r#"{
        "User": {
            "table": "users",
            "fields": {
                "id": "integer",
                "username": "string",
                "is_active": "boolean",
                "created": "datetime"
            },
            "relationships": {
                "supervisor": {
                    "target": "User",
                    "kind": { "belongs_to": { "local_key": "supervisor_id" } }
                },
                "roles": {
                    "target": "Role",
                    "kind": {
                        "many_to_many": {
                            "junction_table": "user_roles",
                            "local_key": "user_id",
                            "remote_key": "role_id"
                        }
                    }
                }
            }
        },
        "Role": {
            "table": "roles",
            "fields": { "id": "integer", "name": "string" }
        }
    }"#;

    #[test]
    fn test_load_valid_model_config() {
        let registry = ModelConfig::from_json_str(MODEL_JSON).unwrap().into_registry();

        let user = registry.entity("User").unwrap();
        assert_eq!(user.name, "User");
        assert_eq!(user.table, "users");
        assert_eq!(user.key, "id");
        assert_eq!(user.fields.get("created"), Some(&FieldType::DateTime));

        let supervisor = user.relationships.get("supervisor").unwrap();
        assert_eq!(supervisor.target, "User");
        assert!(matches!(supervisor.kind, RelationKind::BelongsTo { .. }));

        assert_eq!(registry.entity("Role").unwrap().table, "roles");
    }

    #[test]
    fn test_load_from_file() {
        let temp_file = "test_model_config.json";
        let mut file = fs::File::create(temp_file).unwrap();
        write!(file, "{}", MODEL_JSON).unwrap();

        let config = ModelConfig::from_json_file(temp_file).unwrap();
        assert!(config.entities.contains_key("User"));

        fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_invalid_json_config() {
        assert!(ModelConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(ModelConfig::from_json_file("no_such_model.json").is_err());
    }
}
