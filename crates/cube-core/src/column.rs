//! Column type vocabulary and discovered columns.
//!
//! Type tags come from upstream discovery as plain strings (`int`, `long`,
//! `float`, `double`, `string`, or a date variant such as `DATE[yyyy-MM-dd]`).
//! They are parsed once into [`ColumnType`] and serialized back to the same tag.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::policy::SchemaPolicy;

/// Primitive type of a column, as produced by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnType {
    Int,
    Long,
    Float,
    Double,
    String,
    /// A date-family type. Holds the full tag, pattern included.
    Date(String),
}

impl ColumnType {
    /// The type tag handed to the query engine.
    #[must_use]
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Date(tag) => tag,
        }
    }
}

impl FromStr for ColumnType {
    type Err = CoreError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(CoreError::InvalidColumn {
                name: String::new(),
                type_tag: String::new(),
            });
        }
        if SchemaPolicy::is_date_tag(tag) {
            return Ok(Self::Date(tag.to_string()));
        }
        match tag.to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Int),
            "long" => Ok(Self::Long),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "string" => Ok(Self::String),
            _ => Err(CoreError::UnknownType(tag.to_string())),
        }
    }
}

impl TryFrom<String> for ColumnType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.as_tag().to_string()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub column_type: ColumnType,
}

impl Column {
    /// Build a column from a raw name and type tag.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidColumn`] when either input is blank and
    /// [`CoreError::UnknownType`] when the tag is outside the vocabulary.
    pub fn parse(name: &str, type_tag: &str) -> Result<Self, CoreError> {
        if name.trim().is_empty() || type_tag.trim().is_empty() {
            return Err(CoreError::InvalidColumn {
                name: name.to_string(),
                type_tag: type_tag.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            column_type: type_tag.parse()?,
        })
    }

    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("int", ColumnType::Int)]
    #[case("INT", ColumnType::Int)]
    #[case("long", ColumnType::Long)]
    #[case("float", ColumnType::Float)]
    #[case("double", ColumnType::Double)]
    #[case("String", ColumnType::String)]
    #[case("DATE[yyyy-MM-dd]", ColumnType::Date("DATE[yyyy-MM-dd]".into()))]
    #[case("DATE", ColumnType::Date("DATE".into()))]
    fn parses_known_tags(#[case] tag: &str, #[case] expected: ColumnType) {
        assert_eq!(tag.parse::<ColumnType>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(
            "boolean".parse::<ColumnType>(),
            Err(CoreError::UnknownType("boolean".into()))
        );
    }

    #[test]
    fn rejects_blank_tag() {
        assert!(matches!(
            "  ".parse::<ColumnType>(),
            Err(CoreError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn date_tag_is_preserved() {
        let ty: ColumnType = "DATE[dd/MM/yyyy]".parse().unwrap();
        assert_eq!(ty.as_tag(), "DATE[dd/MM/yyyy]");
    }

    #[test]
    fn column_parse_rejects_empty_name() {
        let err = Column::parse("", "int").unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidColumn {
                name: String::new(),
                type_tag: "int".into()
            }
        );
    }

    #[test]
    fn column_serializes_type_as_tag() {
        let column = Column::new("notional", ColumnType::Double);
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json, serde_json::json!({"name": "notional", "type": "double"}));

        let back: Column = serde_json::from_value(json).unwrap();
        assert_eq!(back, column);
    }

    #[test]
    fn column_deserialization_rejects_unknown_tag() {
        let result: Result<Column, _> =
            serde_json::from_value(serde_json::json!({"name": "flag", "type": "boolean"}));
        assert!(result.is_err());
    }
}
