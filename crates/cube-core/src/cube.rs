//! Logical cube descriptions: dimensions, hierarchies, levels and measures.
//!
//! All collections keep insertion order. Measure order matters: a derived
//! measure's formula may only reference measures defined before it.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::AggregateMode;

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DimensionType {
    #[default]
    Standard,
    Time,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LevelType {
    #[default]
    Regular,
    Time,
}

/// One step of a hierarchy, bound to a physical or synthetic field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LevelSpec {
    pub name: String,
    /// Field the level reads its members from.
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    #[serde(default)]
    pub level_type: LevelType,
}

impl LevelSpec {
    /// A level named after, and bound to, the same field.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            field: name.clone(),
            name,
            formatter: None,
            level_type: LevelType::Regular,
        }
    }

    #[must_use]
    pub fn bound(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            formatter: None,
            level_type: LevelType::Regular,
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: impl Into<String>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    #[must_use]
    pub const fn with_level_type(mut self, level_type: LevelType) -> Self {
        self.level_type = level_type;
        self
    }
}

/// An ordered drill path of levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HierarchySpec {
    pub name: String,
    pub levels: Vec<LevelSpec>,
    #[serde(default)]
    pub default_hierarchy: bool,
    /// Plugin key of an engine-side analysis hierarchy. Such hierarchies have
    /// no levels of their own: the engine populates them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default = "default_all_members")]
    pub all_members_enabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

const fn default_all_members() -> bool {
    true
}

impl HierarchySpec {
    #[must_use]
    pub fn new(name: impl Into<String>, levels: Vec<LevelSpec>) -> Self {
        Self {
            name: name.into(),
            levels,
            all_members_enabled: true,
            ..Self::default()
        }
    }

    /// An analysis hierarchy resolved by the engine through `plugin_key`.
    #[must_use]
    pub fn analysis(
        name: impl Into<String>,
        plugin_key: impl Into<String>,
        folder: impl Into<String>,
        all_members_enabled: bool,
    ) -> Self {
        Self {
            name: name.into(),
            plugin_key: Some(plugin_key.into()),
            folder: Some(folder.into()),
            all_members_enabled,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn as_default(mut self) -> Self {
        self.default_hierarchy = true;
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn level(&self, name: &str) -> Option<&LevelSpec> {
        self.levels.iter().find(|level| level.name == name)
    }
}

/// A named axis owning one or more hierarchies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DimensionSpec {
    pub name: String,
    #[serde(default)]
    pub dimension_type: DimensionType,
    pub hierarchies: Vec<HierarchySpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl DimensionSpec {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hierarchy(&self, name: &str) -> Option<&HierarchySpec> {
        self.hierarchies.iter().find(|h| h.name == name)
    }

    #[must_use]
    pub const fn is_time(&self) -> bool {
        matches!(self.dimension_type, DimensionType::Time)
    }
}

// ---------------------------------------------------------------------------
// Measures
// ---------------------------------------------------------------------------

/// Aggregation applied to raw leaf values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AggregationFunction {
    Sum,
    Min,
    Max,
    /// Sum of squares; feeds the standard deviation formula.
    SqSum,
    /// An engine-side aggregation function referenced by key.
    Plugin(String),
}

impl AggregationFunction {
    /// Engine key, also used as the measure name suffix.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Sum => "SUM",
            Self::Min => "min",
            Self::Max => "max",
            Self::SqSum => "SQ_SUM",
            Self::Plugin(key) => key,
        }
    }

    /// `<field>.<key>`, e.g. `notional.SUM`.
    #[must_use]
    pub fn measure_name(&self, field: &str) -> String {
        format!("{field}.{}", self.key())
    }
}

/// Opaque reference to an engine-side plugin. The core emits it and never
/// inspects its behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExternalMeasureRef {
    pub key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub underlying_measures: Vec<String>,
}

impl ExternalMeasureRef {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_underlying(mut self, measure: impl Into<String>) -> Self {
        self.underlying_measures.push(measure.into());
        self
    }
}

/// How a derived measure is computed from other measures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Calculation {
    /// Postfix formula over `aggregatedValue[<measure>]` operands.
    Formula { expression: String },
    /// Count of distinct contributing leaves, grouped by `level@hierarchy`
    /// expressions.
    LeafCount { leaf_levels: Vec<String> },
    External(ExternalMeasureRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AggregatedMeasure {
    pub name: String,
    /// Source field being aggregated.
    pub field: String,
    pub function: AggregationFunction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    pub visible: bool,
}

impl AggregatedMeasure {
    #[must_use]
    pub fn new(field: impl Into<String>, function: AggregationFunction) -> Self {
        let field = field.into();
        Self {
            name: function.measure_name(&field),
            field,
            function,
            folder: None,
            formatter: None,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DerivedMeasure {
    pub name: String,
    pub calculation: Calculation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    pub visible: bool,
}

impl DerivedMeasure {
    #[must_use]
    pub fn new(name: impl Into<String>, calculation: Calculation) -> Self {
        Self {
            name: name.into(),
            calculation,
            folder: None,
            formatter: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn formula(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::new(
            name,
            Calculation::Formula {
                expression: expression.into(),
            },
        )
    }

    /// The formula expression, if this measure is a formula.
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        match &self.calculation {
            Calculation::Formula { expression } => Some(expression),
            _ => None,
        }
    }
}

/// Measures every cube has regardless of its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NativeKind {
    /// Number of contributing records.
    Count,
    /// Timestamp of the last update of a cell.
    LastUpdate,
}

impl NativeKind {
    /// Engine identifier of the native measure.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Count => "contributors.COUNT",
            Self::LastUpdate => "update.TIMESTAMP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NativeMeasure {
    pub kind: NativeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    pub visible: bool,
}

/// A named, formatted numeric output of the cube.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "measure", rename_all = "snake_case")]
pub enum MeasureSpec {
    Aggregated(AggregatedMeasure),
    Derived(DerivedMeasure),
    Native(NativeMeasure),
}

impl MeasureSpec {
    /// Name the measure is addressed by in queries and formulas.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Aggregated(m) => &m.name,
            Self::Derived(m) => &m.name,
            Self::Native(m) => m.kind.id(),
        }
    }

    #[must_use]
    pub fn folder(&self) -> Option<&str> {
        match self {
            Self::Aggregated(m) => m.folder.as_deref(),
            Self::Derived(m) => m.folder.as_deref(),
            Self::Native(_) => None,
        }
    }

    #[must_use]
    pub fn formatter(&self) -> Option<&str> {
        match self {
            Self::Aggregated(m) => m.formatter.as_deref(),
            Self::Derived(m) => m.formatter.as_deref(),
            Self::Native(m) => m.formatter.as_deref(),
        }
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        match self {
            Self::Aggregated(m) => m.visible,
            Self::Derived(m) => m.visible,
            Self::Native(m) => m.visible,
        }
    }
}

impl From<AggregatedMeasure> for MeasureSpec {
    fn from(value: AggregatedMeasure) -> Self {
        Self::Aggregated(value)
    }
}

impl From<DerivedMeasure> for MeasureSpec {
    fn from(value: DerivedMeasure) -> Self {
        Self::Derived(value)
    }
}

impl From<NativeMeasure> for MeasureSpec {
    fn from(value: NativeMeasure) -> Self {
        Self::Native(value)
    }
}

// ---------------------------------------------------------------------------
// CubeDescription
// ---------------------------------------------------------------------------

/// Query-result cache bound to a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AggregatesCache {
    pub size: u32,
}

/// The logical model of one store.
///
/// An empty description is valid output: a store may have no eligible
/// dimension or measure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CubeDescription {
    pub name: String,
    pub dimensions: Vec<DimensionSpec>,
    pub measures: Vec<MeasureSpec>,
    #[serde(default)]
    pub aggregate_mode: AggregateMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<AggregatesCache>,
}

impl CubeDescription {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_dimension(&mut self, dimension: DimensionSpec) {
        self.dimensions.push(dimension);
    }

    pub fn add_measure(&mut self, measure: impl Into<MeasureSpec>) {
        self.measures.push(measure.into());
    }

    /// Attach a cache of the given size. `None` leaves the cube untouched.
    pub fn set_cache_size(&mut self, size: Option<u32>) {
        if let Some(size) = size {
            self.cache = Some(AggregatesCache { size });
        }
    }

    pub const fn set_aggregate_mode(&mut self, mode: AggregateMode) {
        self.aggregate_mode = mode;
    }

    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&DimensionSpec> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    #[must_use]
    pub fn measure(&self, name: &str) -> Option<&MeasureSpec> {
        self.measures.iter().find(|m| m.name() == name)
    }

    pub fn aggregated_measures(&self) -> impl Iterator<Item = &AggregatedMeasure> {
        self.measures.iter().filter_map(|m| match m {
            MeasureSpec::Aggregated(a) => Some(a),
            _ => None,
        })
    }

    pub fn derived_measures(&self) -> impl Iterator<Item = &DerivedMeasure> {
        self.measures.iter().filter_map(|m| match m {
            MeasureSpec::Derived(d) => Some(d),
            _ => None,
        })
    }

    pub fn native_measures(&self) -> impl Iterator<Item = &NativeMeasure> {
        self.measures.iter().filter_map(|m| match m {
            MeasureSpec::Native(n) => Some(n),
            _ => None,
        })
    }

    /// Measures grouped under `folder`, in definition order.
    pub fn measures_in_folder<'a>(
        &'a self,
        folder: &'a str,
    ) -> impl Iterator<Item = &'a MeasureSpec> + 'a {
        self.measures
            .iter()
            .filter(move |m| m.folder() == Some(folder))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn aggregated_measure_is_named_after_field_and_key() {
        assert_eq!(
            AggregatedMeasure::new("notional", AggregationFunction::Sum).name,
            "notional.SUM"
        );
        assert_eq!(
            AggregatedMeasure::new("notional", AggregationFunction::Min).name,
            "notional.min"
        );
        assert_eq!(
            AggregatedMeasure::new("notional", AggregationFunction::SqSum).name,
            "notional.SQ_SUM"
        );
        assert_eq!(
            AggregatedMeasure::new("pnl", AggregationFunction::Plugin("SUMORSTRING".into())).name,
            "pnl.SUMORSTRING"
        );
    }

    #[test]
    fn cache_size_none_is_a_no_op() {
        let mut cube = CubeDescription::new("trades");
        cube.set_cache_size(None);
        assert_eq!(cube.cache, None);

        cube.set_cache_size(Some(500));
        assert_eq!(cube.cache, Some(AggregatesCache { size: 500 }));

        cube.set_cache_size(None);
        assert_eq!(cube.cache, Some(AggregatesCache { size: 500 }));
    }

    #[test]
    fn measure_accessors_filter_by_variant() {
        let mut cube = CubeDescription::new("trades");
        cube.add_measure(AggregatedMeasure::new("qty", AggregationFunction::Sum));
        cube.add_measure(DerivedMeasure::formula("qty.avg", "a, b, /"));
        cube.add_measure(NativeMeasure {
            kind: NativeKind::Count,
            alias: Some("Count".into()),
            formatter: None,
            visible: true,
        });

        assert_eq!(cube.aggregated_measures().count(), 1);
        assert_eq!(cube.derived_measures().count(), 1);
        assert_eq!(cube.native_measures().count(), 1);
        assert_eq!(
            cube.measure("contributors.COUNT").map(MeasureSpec::name),
            Some("contributors.COUNT")
        );
        assert_eq!(
            cube.derived_measures().next().and_then(DerivedMeasure::expression),
            Some("a, b, /")
        );
    }

    #[test]
    fn measure_serializes_with_variant_tag() {
        let measure: MeasureSpec = AggregatedMeasure::new("qty", AggregationFunction::Max).into();
        let json = serde_json::to_value(&measure).unwrap();
        assert_eq!(json["measure"], "aggregated");
        assert_eq!(json["name"], "qty.max");
        assert_eq!(json["function"], "max");
    }

    #[test]
    fn analysis_hierarchy_has_plugin_and_no_levels() {
        let h = HierarchySpec::analysis("FxTargetCurrency", "FX_AH", "CustomAH", false)
            .with_property("description", "target currency");
        assert!(h.levels.is_empty());
        assert_eq!(h.plugin_key.as_deref(), Some("FX_AH"));
        assert!(!h.all_members_enabled);
        assert_eq!(h.properties["description"], "target currency");
    }
}
