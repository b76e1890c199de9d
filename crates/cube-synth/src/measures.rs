//! Measure synthesis.
//!
//! Measures are appended in dependency order: the native measures first,
//! then per numeric column `SUM`, `min`, `max`, `avg` and, for decimal
//! columns, the hidden `SQ_SUM` followed by `STD`, and finally one distinct
//! count per grouping column. Every formula only references measures that
//! precede it.

use cube_core::{
    AggregatedMeasure, AggregationFunction, Calculation, Column, DerivedMeasure, MeasureSpec,
    NativeKind, NativeMeasure, SchemaPolicy,
    formats::{DOUBLE_FORMAT, INTEGER_FORMAT},
};

use crate::registry::CubeHandle;

/// Folder holding every distinct count measure.
pub const DISTINCT_COUNT_FOLDER: &str = "Distinct Count";

/// `aggregatedValue[<measure>]` formula operand.
pub fn aggregated_value(measure: &str) -> String {
    format!("aggregatedValue[{measure}]")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeasureSynthesizer;

impl MeasureSynthesizer {
    /// `contributors.COUNT` (visible) and `update.TIMESTAMP` (hidden).
    ///
    /// The last-update measure does not compose under just-in-time
    /// aggregation, so it is always generated hidden.
    pub fn native_measures() -> Vec<MeasureSpec> {
        vec![
            NativeMeasure {
                kind: NativeKind::Count,
                alias: Some("Count".into()),
                formatter: Some(INTEGER_FORMAT.into()),
                visible: true,
            }
            .into(),
            NativeMeasure {
                kind: NativeKind::LastUpdate,
                alias: None,
                formatter: None,
                visible: false,
            }
            .into(),
        ]
    }

    /// The SUM/min/max/avg family of a numeric column, plus SQ_SUM and STD
    /// for decimals. Empty for non-measure columns.
    pub fn numeric_measures(column: &Column) -> Vec<MeasureSpec> {
        if !SchemaPolicy::is_measure_candidate(column) {
            return Vec::new();
        }
        let name = column.name.as_str();
        let formatter = SchemaPolicy::number_formatter(&column.column_type);
        let aggregated = |function: AggregationFunction, visible: bool| {
            let mut measure = AggregatedMeasure::new(name, function);
            measure.folder = Some(name.to_string());
            measure.formatter = Some(formatter.to_string());
            measure.visible = visible;
            MeasureSpec::from(measure)
        };
        let derived = |measure_name: String, expression: String| {
            let mut measure = DerivedMeasure::formula(measure_name, expression);
            measure.folder = Some(name.to_string());
            measure.formatter = Some(DOUBLE_FORMAT.to_string());
            MeasureSpec::from(measure)
        };

        let count = aggregated_value(NativeKind::Count.id());
        let sum = aggregated_value(&AggregationFunction::Sum.measure_name(name));

        let mut measures = vec![
            aggregated(AggregationFunction::Sum, true),
            aggregated(AggregationFunction::Min, true),
            aggregated(AggregationFunction::Max, true),
            derived(format!("{name}.avg"), format!("{sum}, {count}, /")),
        ];

        if SchemaPolicy::is_decimal(&column.column_type) {
            let square_sum = aggregated_value(&AggregationFunction::SqSum.measure_name(name));
            let avg = aggregated_value(&format!("{name}.avg"));
            measures.push(aggregated(AggregationFunction::SqSum, false));
            measures.push(derived(
                format!("{name}.STD"),
                format!("({square_sum}, {count}, /), ({avg}, {avg}, *), -, SQRT"),
            ));
        }

        tracing::debug!(column = name, count = measures.len(), "synthesized numeric measures");
        measures
    }

    /// `<col>.COUNT`: distinct contributing leaves on the column's own level.
    pub fn distinct_count(column: &Column) -> Option<MeasureSpec> {
        if !SchemaPolicy::is_dimension_candidate(column) {
            return None;
        }
        let name = &column.name;
        let mut measure = DerivedMeasure::new(
            format!("{name}.COUNT"),
            Calculation::LeafCount {
                leaf_levels: vec![format!("{name}@{name}")],
            },
        );
        measure.folder = Some(DISTINCT_COUNT_FOLDER.to_string());
        Some(measure.into())
    }

    /// Every measure of a column list, in dependency order.
    pub fn measures(columns: &[Column]) -> Vec<MeasureSpec> {
        let mut measures = Self::native_measures();
        measures.extend(columns.iter().flat_map(Self::numeric_measures));
        measures.extend(columns.iter().filter_map(Self::distinct_count));
        measures
    }

    pub fn synthesize(columns: &[Column], cube: &CubeHandle) {
        let measures = Self::measures(columns);
        cube.update(|description| description.measures.extend(measures));
    }
}

#[cfg(test)]
mod tests {
    use cube_core::ColumnType;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn names(measures: &[MeasureSpec]) -> Vec<&str> {
        measures.iter().map(MeasureSpec::name).collect()
    }

    #[rstest]
    #[case(ColumnType::Double)]
    #[case(ColumnType::Float)]
    fn decimal_column_gets_six_measures(#[case] ty: ColumnType) {
        let measures = MeasureSynthesizer::numeric_measures(&Column::new("pv", ty));
        assert_eq!(
            names(&measures),
            vec!["pv.SUM", "pv.min", "pv.max", "pv.avg", "pv.SQ_SUM", "pv.STD"]
        );
        assert!(!measures[4].is_visible());
        assert!(measures.iter().all(|m| m.folder() == Some("pv")));
        assert!(measures.iter().all(|m| m.formatter() == Some(DOUBLE_FORMAT)));
    }

    #[rstest]
    #[case(ColumnType::Int)]
    #[case(ColumnType::Long)]
    fn integer_column_gets_four_measures(#[case] ty: ColumnType) {
        let measures = MeasureSynthesizer::numeric_measures(&Column::new("qty", ty));
        assert_eq!(names(&measures), vec!["qty.SUM", "qty.min", "qty.max", "qty.avg"]);
        assert_eq!(measures[0].formatter(), Some(INTEGER_FORMAT));
        assert_eq!(measures[3].formatter(), Some(DOUBLE_FORMAT));
    }

    #[test]
    fn formulas_use_postfix_operands() {
        let measures = MeasureSynthesizer::numeric_measures(&Column::new("pv", ColumnType::Double));
        let formula = |i: usize| match &measures[i] {
            MeasureSpec::Derived(d) => d.expression().unwrap_or_default().to_string(),
            other => panic!("expected derived measure, got {other:?}"),
        };
        assert_eq!(
            formula(3),
            "aggregatedValue[pv.SUM], aggregatedValue[contributors.COUNT], /"
        );
        assert_eq!(
            formula(5),
            "(aggregatedValue[pv.SQ_SUM], aggregatedValue[contributors.COUNT], /), \
             (aggregatedValue[pv.avg], aggregatedValue[pv.avg], *), -, SQRT"
        );
    }

    #[rstest]
    #[case("trade_id", ColumnType::Int)]
    #[case("BookID", ColumnType::Double)]
    #[case("ccy", ColumnType::String)]
    #[case("trade_date", ColumnType::Date("DATE[yyyy-MM-dd]".into()))]
    fn non_measure_columns_get_nothing(#[case] name: &str, #[case] ty: ColumnType) {
        assert!(MeasureSynthesizer::numeric_measures(&Column::new(name, ty)).is_empty());
    }

    #[test]
    fn distinct_count_groups_by_own_level() {
        let measure = MeasureSynthesizer::distinct_count(&Column::new("ccy", ColumnType::String))
            .unwrap();
        let MeasureSpec::Derived(derived) = measure else {
            panic!("distinct count must be derived");
        };
        assert_eq!(derived.name, "ccy.COUNT");
        assert_eq!(derived.folder.as_deref(), Some(DISTINCT_COUNT_FOLDER));
        assert_eq!(
            derived.calculation,
            Calculation::LeafCount {
                leaf_levels: vec!["ccy@ccy".into()]
            }
        );
    }

    #[test]
    fn distinct_count_skips_metrics_and_numeric_identifiers() {
        assert!(MeasureSynthesizer::distinct_count(&Column::new("pv", ColumnType::Double)).is_none());
        assert!(MeasureSynthesizer::distinct_count(&Column::new("trade_id", ColumnType::Int)).is_none());
        assert!(MeasureSynthesizer::distinct_count(&Column::new("qty", ColumnType::Int)).is_some());
    }

    #[test]
    fn native_measures_count_visible_last_update_hidden() {
        let natives = MeasureSynthesizer::native_measures();
        assert_eq!(names(&natives), vec!["contributors.COUNT", "update.TIMESTAMP"]);
        assert!(natives[0].is_visible());
        assert_eq!(natives[0].formatter(), Some(INTEGER_FORMAT));
        assert!(!natives[1].is_visible());
    }

    #[test]
    fn categorical_only_store_has_no_numeric_measures() {
        let measures = MeasureSynthesizer::measures(&[
            Column::new("ccy", ColumnType::String),
            Column::new("trade_id", ColumnType::Int),
            Column::new("trade_date", ColumnType::Date("DATE".into())),
        ]);
        assert!(
            measures
                .iter()
                .all(|m| matches!(m, MeasureSpec::Native(_))
                    || m.folder() == Some(DISTINCT_COUNT_FOLDER))
        );
    }

    #[test]
    fn formula_operands_are_defined_earlier() {
        let measures = MeasureSynthesizer::measures(&[
            Column::new("pv", ColumnType::Double),
            Column::new("qty", ColumnType::Long),
            Column::new("ccy", ColumnType::String),
        ]);
        for (index, measure) in measures.iter().enumerate() {
            let MeasureSpec::Derived(derived) = measure else {
                continue;
            };
            let Some(expression) = derived.expression() else {
                continue;
            };
            for operand in expression.split("aggregatedValue[").skip(1) {
                let referenced = operand.split(']').next().unwrap();
                assert!(
                    measures[..index].iter().any(|m| m.name() == referenced),
                    "{} references {referenced} before it is defined",
                    derived.name
                );
            }
        }
    }
}
