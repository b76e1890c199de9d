use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::errors::CoreError;

/// Column layout of a data source, as produced once by upstream discovery.
///
/// May describe a single sample file standing in for an entire watched
/// directory. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiscoveredSchema {
    /// Stable source name (file stem of the discovered file).
    pub source_name: String,
    pub separator: char,
    pub columns: Vec<Column>,
    /// Path of the file the layout was discovered from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl DiscoveredSchema {
    /// Build a discovered schema from raw `(name, type tag)` pairs.
    ///
    /// # Errors
    ///
    /// Fails fast on the first blank name/type or unknown type tag.
    pub fn from_tags<'a, I>(
        source_name: impl Into<String>,
        separator: char,
        columns: I,
    ) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, tag)| Column::parse(name, tag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source_name: source_name.into(),
            separator,
            columns,
            origin: None,
        })
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Re-check the column contract after deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidColumn`] for a blank column name.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(column) = self.columns.iter().find(|c| c.name.trim().is_empty()) {
            return Err(CoreError::InvalidColumn {
                name: column.name.clone(),
                type_tag: column.column_type.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::column::ColumnType;

    #[test]
    fn from_tags_preserves_order() {
        let schema = DiscoveredSchema::from_tags(
            "trades",
            ';',
            [("trade_id", "int"), ("notional", "double"), ("ccy", "string")],
        )
        .unwrap();

        let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["trade_id", "notional", "ccy"]);
        assert_eq!(schema.columns()[1].column_type, ColumnType::Double);
        assert_eq!(schema.separator, ';');
    }

    #[test]
    fn from_tags_fails_fast_on_blank_type() {
        let err = DiscoveredSchema::from_tags("trades", ',', [("a", "int"), ("b", "")]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidColumn { name, .. } if name == "b"));
    }

    #[test]
    fn validate_rejects_blank_name_from_json() {
        let schema: DiscoveredSchema = serde_json::from_value(serde_json::json!({
            "source_name": "trades",
            "separator": ",",
            "columns": [{"name": " ", "type": "int"}]
        }))
        .unwrap();
        assert!(schema.validate().is_err());
    }
}
