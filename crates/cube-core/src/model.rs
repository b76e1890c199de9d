//! The complete output of a generation run.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::manager::ManagerDescription;
use crate::store::StoreDescription;
use crate::warning::Warning;

/// Physical layout of every store, primary and reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DatastoreSchema {
    pub stores: Vec<StoreDescription>,
}

impl DatastoreSchema {
    #[must_use]
    pub fn store(&self, name: &str) -> Option<&StoreDescription> {
        self.stores.iter().find(|store| store.name == name)
    }
}

/// How the ingestion side should read the files of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SourceBinding {
    pub store: String,
    pub separator: char,
    /// Resolved charset name.
    pub charset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedModel {
    pub datastore: DatastoreSchema,
    pub manager: ManagerDescription,
    pub sources: Vec<SourceBinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}
