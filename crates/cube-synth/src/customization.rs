//! Late-bound customizations appended after regular synthesis.
//!
//! A customization targets stores by name and writes straight into their
//! cube description. Engine plugins are referenced by key only.

use cube_core::{
    AggregatedMeasure, AggregationFunction, Calculation, DerivedMeasure, DimensionSpec,
    ExternalMeasureRef, HierarchySpec, formats::DOUBLE_FORMAT,
};

use crate::registry::CubeHandle;

pub trait Customization: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn applies_to(&self, store: &str) -> bool;

    fn apply(&self, cube: &CubeHandle);
}

/// Plugin keys and property names understood by the engine.
pub mod keys {
    pub const FX_TARGET_CURRENCY_HIERARCHY: &str = "FX_AH";
    pub const CURRENCY_GROUP_HIERARCHY: &str = "CUR_GROUP_AH";
    pub const SUM_OR_STRING: &str = "SUMORSTRING";
    pub const FX_POST_PROCESSOR: &str = "FX_PP";
    pub const CURRENCY_GROUP_POST_PROCESSOR: &str = "CGMTM_PP";

    pub const LEAF_LEVELS: &str = "leafLevels";
    pub const ANALYSIS_LEVELS: &str = "analysisLevels";
    pub const AGGREGATION_FUNCTION: &str = "aggregationFunction";
}

pub const ANALYSIS_DIMENSION: &str = "Analysis Dimension";
const ANALYSIS_FOLDER: &str = "CustomAH";
const MEASURE_FOLDER: &str = "CustomPP";
const DESCRIPTION: &str = "description";

/// Currency conversion and currency-group analysis for a P&L store.
///
/// Adds an analysis dimension with a target-currency and a currency-group
/// hierarchy, a hidden `pnl` aggregate and two plugin measures computed on
/// top of `pnl.SUM`.
#[derive(Debug, Clone)]
pub struct CurrencyCustomization {
    store: String,
}

impl CurrencyCustomization {
    pub fn new(store: impl Into<String>) -> Self {
        Self {
            store: store.into(),
        }
    }

    pub fn analysis_dimension() -> DimensionSpec {
        let mut dimension = DimensionSpec::new(ANALYSIS_DIMENSION);
        dimension.properties.insert(
            DESCRIPTION.into(),
            "Analysis Dimension associated to custom post processors".into(),
        );
        dimension.hierarchies = vec![
            HierarchySpec::analysis(
                "FxTargetCurrency",
                keys::FX_TARGET_CURRENCY_HIERARCHY,
                ANALYSIS_FOLDER,
                false,
            )
            .with_property(DESCRIPTION, "Target currency used to countervaluate pnl"),
            HierarchySpec::analysis(
                "CurrencyGroup",
                keys::CURRENCY_GROUP_HIERARCHY,
                ANALYSIS_FOLDER,
                true,
            )
            .with_property(DESCRIPTION, "Handle currencies group name"),
        ];
        dimension
    }

    pub fn pnl_measure() -> AggregatedMeasure {
        let mut measure = AggregatedMeasure::new(
            "pnl",
            AggregationFunction::Plugin(keys::SUM_OR_STRING.into()),
        );
        measure.folder = Some(MEASURE_FOLDER.into());
        measure.formatter = Some(DOUBLE_FORMAT.into());
        measure.visible = false;
        measure
    }

    pub fn fx_measure() -> DerivedMeasure {
        plugin_measure(
            "FxMeasure",
            ExternalMeasureRef::new(keys::FX_POST_PROCESSOR)
                .with_parameter(
                    keys::LEAF_LEVELS,
                    "Currency@Currency@Currency,FxTargetCurrency@FxTargetCurrency@Analysis Dimension",
                )
                .with_parameter(keys::AGGREGATION_FUNCTION, keys::SUM_OR_STRING)
                .with_underlying("pnl.SUM"),
        )
    }

    pub fn currency_group_measure() -> DerivedMeasure {
        plugin_measure(
            "CGMTMMeasure",
            ExternalMeasureRef::new(keys::CURRENCY_GROUP_POST_PROCESSOR)
                .with_parameter(
                    keys::ANALYSIS_LEVELS,
                    "CurrencyGroup@CurrencyGroup@Analysis Dimension,CurrencyGroup_1@CurrencyGroup@Analysis Dimension",
                )
                .with_parameter(
                    keys::LEAF_LEVELS,
                    "Currency@Currency@Currency,CurrencyGroup_1@CurrencyGroup@Analysis Dimension",
                )
                .with_parameter(keys::AGGREGATION_FUNCTION, keys::SUM_OR_STRING)
                .with_underlying("pnl.SUM"),
        )
    }
}

fn plugin_measure(name: &str, plugin: ExternalMeasureRef) -> DerivedMeasure {
    let mut measure = DerivedMeasure::new(name, Calculation::External(plugin));
    measure.folder = Some(MEASURE_FOLDER.into());
    measure.formatter = Some(DOUBLE_FORMAT.into());
    measure
}

impl Customization for CurrencyCustomization {
    fn name(&self) -> &str {
        "currency"
    }

    fn applies_to(&self, store: &str) -> bool {
        self.store == store
    }

    fn apply(&self, cube: &CubeHandle) {
        tracing::info!(store = %self.store, "attaching currency analysis");
        cube.update(|description| {
            description.add_dimension(Self::analysis_dimension());
            description.add_measure(Self::pnl_measure());
            description.add_measure(Self::fx_measure());
            description.add_measure(Self::currency_group_measure());
        });
    }
}

#[cfg(test)]
mod tests {
    use cube_core::MeasureSpec;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::registry::CubeDescriptionRegistry;

    #[test]
    fn applies_only_to_its_store() {
        let custom = CurrencyCustomization::new("risks");
        assert!(custom.applies_to("risks"));
        assert!(!custom.applies_to("trades"));
        assert!(!custom.applies_to("RISKS"));
    }

    #[test]
    fn appends_dimension_and_measures() {
        let registry = CubeDescriptionRegistry::new();
        let cube = registry.get_or_create("risks");
        CurrencyCustomization::new("risks").apply(&cube);

        let description = cube.snapshot();
        let dimension = description.dimension(ANALYSIS_DIMENSION).unwrap();
        let fx = dimension.hierarchy("FxTargetCurrency").unwrap();
        assert_eq!(fx.plugin_key.as_deref(), Some("FX_AH"));
        assert!(!fx.all_members_enabled);
        let group = dimension.hierarchy("CurrencyGroup").unwrap();
        assert_eq!(group.plugin_key.as_deref(), Some("CUR_GROUP_AH"));
        assert!(group.all_members_enabled);
        assert_eq!(group.folder.as_deref(), Some("CustomAH"));

        let names: Vec<&str> = description.measures.iter().map(MeasureSpec::name).collect();
        assert_eq!(names, vec!["pnl.SUMORSTRING", "FxMeasure", "CGMTMMeasure"]);
        assert!(!description.measures[0].is_visible());
        assert!(
            description
                .measures_in_folder("CustomPP")
                .all(|m| m.formatter() == Some(DOUBLE_FORMAT))
        );
    }

    #[test]
    fn plugin_measures_consume_pnl_sum() {
        let Calculation::External(plugin) = CurrencyCustomization::currency_group_measure().calculation
        else {
            panic!("expected an external measure");
        };
        assert_eq!(plugin.key, "CGMTM_PP");
        assert_eq!(plugin.underlying_measures, vec!["pnl.SUM".to_string()]);
        assert_eq!(plugin.parameters[keys::AGGREGATION_FUNCTION], "SUMORSTRING");
        assert!(plugin.parameters.contains_key(keys::ANALYSIS_LEVELS));
    }
}
