//! Store specs and the physical record layout.
//!
//! A [`StoreSpec`] is the per-source input to synthesis: the discovered
//! columns plus the source policy (partition override, cache size, aggregate
//! mode). A [`StoreDescription`] is the physical layout handed to the engine.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnType};
use crate::discovered::DiscoveredSchema;
use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// AggregateMode
// ---------------------------------------------------------------------------

/// How the engine computes aggregates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateMode {
    /// Aggregates computed on demand.
    #[default]
    #[serde(alias = "just_in_time")]
    JustInTime,
    /// Aggregates precomputed and stored.
    #[serde(alias = "bitmap")]
    Bitmap,
}

impl AggregateMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JustInTime => "JUST_IN_TIME",
            Self::Bitmap => "BITMAP",
        }
    }
}

impl fmt::Display for AggregateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AggregateMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JUST_IN_TIME" => Ok(Self::JustInTime),
            "BITMAP" => Ok(Self::Bitmap),
            other => Err(CoreError::Validation(format!(
                "unknown aggregate mode '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// SourcePolicy
// ---------------------------------------------------------------------------

/// Per-source policy bundle supplied by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePolicy {
    /// Partition field override, matched case-insensitively.
    pub partition_field: Option<String>,
    /// Query-result cache size.
    pub cache_size: Option<u32>,
    pub aggregate_mode: AggregateMode,
}

// ---------------------------------------------------------------------------
// StoreSpec
// ---------------------------------------------------------------------------

/// Synthesis input for one store. `columns` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSpec {
    pub store_name: String,
    pub partition_field: Option<String>,
    columns: Vec<Column>,
    pub cache_size: Option<u32>,
    pub aggregate_mode: AggregateMode,
}

impl StoreSpec {
    #[must_use]
    pub fn builder(store_name: impl Into<String>) -> StoreSpecBuilder {
        StoreSpecBuilder {
            store_name: store_name.into(),
            partition_field: None,
            columns: Vec::new(),
            cache_size: None,
            aggregate_mode: AggregateMode::default(),
        }
    }

    /// Combine a discovered layout with the source policy.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidColumn`] on a blank column name and
    /// [`CoreError::EmptyStore`] when discovery yielded no column.
    pub fn from_discovered(
        store_name: impl Into<String>,
        discovered: &DiscoveredSchema,
        policy: &SourcePolicy,
    ) -> Result<Self, CoreError> {
        discovered.validate()?;
        let mut builder = Self::builder(store_name).policy(policy);
        for column in discovered.columns() {
            builder = builder.column(column.clone())?;
        }
        builder.build()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The override, if one is set and non-blank.
    #[must_use]
    pub fn partition_override(&self) -> Option<&str> {
        self.partition_field
            .as_deref()
            .map(str::trim)
            .filter(|field| !field.is_empty())
    }

    /// Case-insensitive column lookup.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }
}

/// Incremental builder for [`StoreSpec`]; rejects malformed columns
/// immediately.
#[derive(Debug, Clone)]
pub struct StoreSpecBuilder {
    store_name: String,
    partition_field: Option<String>,
    columns: Vec<Column>,
    cache_size: Option<u32>,
    aggregate_mode: AggregateMode,
}

impl StoreSpecBuilder {
    #[must_use]
    pub fn partition_field(mut self, field: impl Into<String>) -> Self {
        self.partition_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn cache_size(mut self, size: Option<u32>) -> Self {
        self.cache_size = size;
        self
    }

    #[must_use]
    pub fn aggregate_mode(mut self, mode: AggregateMode) -> Self {
        self.aggregate_mode = mode;
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: &SourcePolicy) -> Self {
        self.partition_field.clone_from(&policy.partition_field);
        self.cache_size = policy.cache_size;
        self.aggregate_mode = policy.aggregate_mode;
        self
    }

    /// Append an already-typed column.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidColumn`] when the name is blank.
    pub fn column(mut self, column: Column) -> Result<Self, CoreError> {
        if column.name.trim().is_empty() {
            return Err(CoreError::InvalidColumn {
                name: column.name,
                type_tag: column.column_type.to_string(),
            });
        }
        self.columns.push(column);
        Ok(self)
    }

    /// Append a column from a raw name and type tag.
    ///
    /// # Errors
    ///
    /// See [`Column::parse`].
    pub fn add_column(self, name: &str, type_tag: &str) -> Result<Self, CoreError> {
        let column = Column::parse(name, type_tag)?;
        self.column(column)
    }

    /// Finish the store spec.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyStore`] when no column was added.
    pub fn build(self) -> Result<StoreSpec, CoreError> {
        if self.columns.is_empty() {
            return Err(CoreError::EmptyStore(self.store_name));
        }
        Ok(StoreSpec {
            store_name: self.store_name,
            partition_field: self.partition_field,
            columns: self.columns,
            cache_size: self.cache_size,
            aggregate_mode: self.aggregate_mode,
        })
    }
}

// ---------------------------------------------------------------------------
// Date parts
// ---------------------------------------------------------------------------

/// One component of a decomposed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatePart {
    Year,
    Month,
    Day,
}

/// A value computed for a synthetic field at ingestion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i32),
    Text(String),
}

impl DatePart {
    pub const ALL: [Self; 3] = [Self::Year, Self::Month, Self::Day];

    /// Suffix appended to the source column name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
        }
    }

    /// Level name in the `_YMD` hierarchy.
    #[must_use]
    pub const fn level_name(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Month => "Month",
            Self::Day => "Day",
        }
    }

    #[must_use]
    pub const fn field_type(self) -> ColumnType {
        match self {
            Self::Year | Self::Day => ColumnType::Int,
            Self::Month => ColumnType::String,
        }
    }

    /// `<column>.YEAR`, `<column>.MONTH` or `<column>.DAY`.
    #[must_use]
    pub fn field_name(self, column: &str) -> String {
        format!("{column}.{}", self.suffix())
    }

    /// Derive this part from a parsed date. Months are zero-padded so the
    /// string level sorts chronologically.
    #[must_use]
    pub fn evaluate(self, date: NaiveDate) -> FieldValue {
        match self {
            Self::Year => FieldValue::Int(date.year()),
            Self::Month => FieldValue::Text(format!("{:02}", date.month())),
            Self::Day => FieldValue::Int(i32::try_from(date.day()).unwrap_or_default()),
        }
    }
}

/// Provenance of a synthetic field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DerivedField {
    pub source: String,
    pub part: DatePart,
}

// ---------------------------------------------------------------------------
// Physical layout
// ---------------------------------------------------------------------------

/// One physical field of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub field_type: ColumnType,
    /// Dictionary-encoding hint.
    pub indexed: bool,
    /// Set for synthetic fields that have no counterpart in the source data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived: Option<DerivedField>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn date_part(column: &str, part: DatePart) -> Self {
        Self {
            name: part.field_name(column),
            field_type: part.field_type(),
            indexed: true,
            derived: Some(DerivedField {
                source: column.to_string(),
                part,
            }),
        }
    }

    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.derived.is_some()
    }
}

/// Modulo partitioning on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Partitioning {
    pub field: String,
    pub partition_count: u32,
}

/// Physical record layout of one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StoreDescription {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitioning: Option<Partitioning>,
}

impl StoreDescription {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builder_rejects_empty_store() {
        let err = StoreSpec::builder("empty").build().unwrap_err();
        assert_eq!(err, CoreError::EmptyStore("empty".into()));
    }

    #[test]
    fn builder_rejects_blank_column_name() {
        let err = StoreSpec::builder("trades")
            .add_column("", "int")
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidColumn { .. }));
    }

    #[test]
    fn from_discovered_rejects_blank_name_from_json() {
        let discovered: DiscoveredSchema = serde_json::from_value(serde_json::json!({
            "source_name": "trades",
            "separator": ",",
            "columns": [{"name": "ccy", "type": "string"}, {"name": "", "type": "int"}]
        }))
        .unwrap();

        let err = StoreSpec::from_discovered("trades", &discovered, &SourcePolicy::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidColumn { name, .. } if name.is_empty()));
    }

    #[test]
    fn from_discovered_copies_columns_and_policy() {
        let discovered =
            DiscoveredSchema::from_tags("trades", ',', [("ccy", "string"), ("qty", "int")])
                .unwrap();
        let policy = SourcePolicy {
            partition_field: Some("CCY".into()),
            cache_size: Some(1000),
            aggregate_mode: AggregateMode::Bitmap,
        };

        let spec = StoreSpec::from_discovered("risks", &discovered, &policy).unwrap();

        assert_eq!(spec.store_name, "risks");
        assert_eq!(spec.columns(), discovered.columns());
        assert_eq!(spec.partition_override(), Some("CCY"));
        assert_eq!(spec.cache_size, Some(1000));
        assert_eq!(spec.aggregate_mode, AggregateMode::Bitmap);
        assert_eq!(spec.find_column("ccy").map(|c| c.name.as_str()), Some("ccy"));
    }

    #[test]
    fn blank_partition_override_is_ignored() {
        let spec = StoreSpec::builder("s")
            .partition_field("  ")
            .add_column("a", "string")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(spec.partition_override(), None);
    }

    #[test]
    fn date_parts_evaluate_independently() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(DatePart::Year.evaluate(date), FieldValue::Int(2024));
        assert_eq!(DatePart::Month.evaluate(date), FieldValue::Text("03".into()));
        assert_eq!(DatePart::Day.evaluate(date), FieldValue::Int(7));
    }

    #[test]
    fn date_part_field_descriptor() {
        let field = FieldDescriptor::date_part("trade_date", DatePart::Month);
        assert_eq!(field.name, "trade_date.MONTH");
        assert_eq!(field.field_type, ColumnType::String);
        assert!(field.indexed);
        assert!(field.is_synthetic());
    }

    #[test]
    fn aggregate_mode_parses_both_spellings() {
        assert_eq!("bitmap".parse::<AggregateMode>().unwrap(), AggregateMode::Bitmap);
        assert_eq!(
            "JUST_IN_TIME".parse::<AggregateMode>().unwrap(),
            AggregateMode::JustInTime
        );
        assert!("lazy".parse::<AggregateMode>().is_err());
    }
}
