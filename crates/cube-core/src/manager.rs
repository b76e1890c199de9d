//! Manager-level descriptions: one catalog and one schema per store.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cube::CubeDescription;

/// Groups cubes for query clients. AutoCube emits one per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogDescription {
    pub name: String,
    pub cubes: Vec<String>,
}

impl CatalogDescription {
    pub const SUFFIX: &'static str = "_CATALOG";

    #[must_use]
    pub fn for_store(store: &str) -> Self {
        Self {
            name: format!("{store}{}", Self::SUFFIX),
            cubes: vec![store.to_string()],
        }
    }
}

/// The fields of a base store exposed to the cubes of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionDescription {
    pub base_store: String,
    pub fields: Vec<String>,
}

/// A datastore selection plus the cubes built on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDescription {
    pub name: String,
    pub selection: SelectionDescription,
    pub cubes: Vec<CubeDescription>,
}

impl SchemaDescription {
    pub const SUFFIX: &'static str = "_SCHEMA";

    #[must_use]
    pub fn for_store(store: &str, fields: Vec<String>, cube: CubeDescription) -> Self {
        Self {
            name: format!("{store}{}", Self::SUFFIX),
            selection: SelectionDescription {
                base_store: store.to_string(),
                fields,
            },
            cubes: vec![cube],
        }
    }
}

/// Top-level description consumed by the query engine at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ManagerDescription {
    pub catalogs: Vec<CatalogDescription>,
    pub schemas: Vec<SchemaDescription>,
}

impl ManagerDescription {
    /// Look up a cube by store name across all schemas.
    #[must_use]
    pub fn cube(&self, name: &str) -> Option<&CubeDescription> {
        self.schemas
            .iter()
            .flat_map(|schema| schema.cubes.iter())
            .find(|cube| cube.name == name)
    }

    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&SchemaDescription> {
        self.schemas.iter().find(|schema| schema.name == name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn names_follow_store() {
        let catalog = CatalogDescription::for_store("trades");
        assert_eq!(catalog.name, "trades_CATALOG");
        assert_eq!(catalog.cubes, vec!["trades".to_string()]);

        let schema =
            SchemaDescription::for_store("trades", vec!["ccy".into()], CubeDescription::new("trades"));
        assert_eq!(schema.name, "trades_SCHEMA");
        assert_eq!(schema.selection.base_store, "trades");
    }

    #[test]
    fn cube_lookup_spans_schemas() {
        let manager = ManagerDescription {
            catalogs: vec![],
            schemas: vec![
                SchemaDescription::for_store("a", vec![], CubeDescription::new("a")),
                SchemaDescription::for_store("b", vec![], CubeDescription::new("b")),
            ],
        };
        assert!(manager.cube("b").is_some());
        assert!(manager.cube("c").is_none());
        assert!(manager.schema("a_SCHEMA").is_some());
    }
}
