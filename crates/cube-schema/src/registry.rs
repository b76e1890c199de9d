//! Central schema registry for the produced types.

use std::collections::HashMap;

use cube_core::{
    CubeDescription, DimensionSpec, DiscoveredSchema, GeneratedModel, ManagerDescription,
    MeasureSpec, StoreDescription, Warning,
};
use schemars::schema_for;
use serde_json::Value;

use crate::error::SchemaError;

pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Value>,
}

macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, Value::from(schema_for!($ty)));
    };
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Discovery input ---
        register!(schemas, "discovered_schema", DiscoveredSchema);

        // --- Physical layout ---
        register!(schemas, "store_description", StoreDescription);

        // --- Logical model ---
        register!(schemas, "cube_description", CubeDescription);
        register!(schemas, "dimension_spec", DimensionSpec);
        register!(schemas, "measure_spec", MeasureSpec);
        register!(schemas, "manager_description", ManagerDescription);

        // --- Full output ---
        register!(schemas, "generated_model", GeneratedModel);
        register!(schemas, "warning", Warning);

        Self { schemas }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotFound`] for an unregistered name and
    /// [`SchemaError::ValidationFailed`] listing every violation.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;
        let validator =
            jsonschema::validator_for(schema).map_err(|error| SchemaError::Compilation {
                schema: name.to_string(),
                reason: error.to_string(),
            })?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|error| format!("{}: {error}", error.instance_path))
            .collect();
        if errors.is_empty() {
            return Ok(());
        }
        Err(SchemaError::ValidationFailed {
            schema: name.to_string(),
            errors,
        })
    }

    /// Registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
