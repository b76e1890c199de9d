//! Dimension synthesis for categorical and temporal columns.

use cube_core::{
    Column, DatePart, DimensionSpec, DimensionType, HierarchySpec, LevelSpec, LevelType,
    SchemaPolicy, formats::DATE_FORMAT,
};

use crate::registry::CubeHandle;

/// Suffix of the year/month/day hierarchy of a date dimension.
pub const YMD_SUFFIX: &str = "_YMD";

#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionSynthesizer;

impl DimensionSynthesizer {
    /// The dimension of one column, or `None` when the column is not a
    /// grouping key.
    pub fn dimension(column: &Column) -> Option<DimensionSpec> {
        if !SchemaPolicy::is_dimension_candidate(column) {
            tracing::debug!(column = %column.name, "not a dimension");
            return None;
        }
        let name = &column.name;
        let mut dimension = DimensionSpec::new(name.clone());

        if SchemaPolicy::is_date_type(&column.column_type) {
            dimension.dimension_type = DimensionType::Time;
            let date = HierarchySpec::new(
                name.clone(),
                vec![
                    LevelSpec::named(name.clone())
                        .with_formatter(DATE_FORMAT)
                        .with_level_type(LevelType::Time),
                ],
            )
            .as_default();
            let ymd = HierarchySpec::new(
                format!("{name}{YMD_SUFFIX}"),
                DatePart::ALL
                    .iter()
                    .map(|part| LevelSpec::bound(part.level_name(), part.field_name(name)))
                    .collect(),
            );
            dimension.hierarchies = vec![date, ymd];
        } else {
            dimension.hierarchies = vec![HierarchySpec::new(
                name.clone(),
                vec![LevelSpec::named(name.clone())],
            )];
        }

        tracing::debug!(
            column = %name,
            time = dimension.is_time(),
            "synthesized dimension"
        );
        Some(dimension)
    }

    /// Append one dimension per eligible column, in declaration order.
    pub fn synthesize(columns: &[Column], cube: &CubeHandle) {
        let dimensions: Vec<DimensionSpec> = columns.iter().filter_map(Self::dimension).collect();
        cube.update(|description| description.dimensions.extend(dimensions));
    }
}

#[cfg(test)]
mod tests {
    use cube_core::ColumnType;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::registry::CubeDescriptionRegistry;

    fn date() -> ColumnType {
        ColumnType::Date("DATE[yyyy-MM-dd]".into())
    }

    #[test]
    fn categorical_column_gets_single_hierarchy() {
        let dim = DimensionSynthesizer::dimension(&Column::new("ccy", ColumnType::String)).unwrap();
        assert_eq!(dim.name, "ccy");
        assert_eq!(dim.dimension_type, DimensionType::Standard);
        assert_eq!(dim.hierarchies.len(), 1);
        assert_eq!(dim.hierarchies[0].levels, vec![LevelSpec::named("ccy")]);
    }

    #[test]
    fn date_column_gets_time_dimension_with_two_hierarchies() {
        let dim = DimensionSynthesizer::dimension(&Column::new("trade_date", date())).unwrap();
        assert!(dim.is_time());

        let names: Vec<&str> = dim.hierarchies.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["trade_date", "trade_date_YMD"]);

        let default = &dim.hierarchies[0];
        assert!(default.default_hierarchy);
        assert_eq!(default.levels[0].formatter.as_deref(), Some(DATE_FORMAT));
        assert_eq!(default.levels[0].level_type, LevelType::Time);

        let ymd = &dim.hierarchies[1];
        assert!(!ymd.default_hierarchy);
        let levels: Vec<(&str, &str)> = ymd
            .levels
            .iter()
            .map(|l| (l.name.as_str(), l.field.as_str()))
            .collect();
        assert_eq!(
            levels,
            vec![
                ("Year", "trade_date.YEAR"),
                ("Month", "trade_date.MONTH"),
                ("Day", "trade_date.DAY"),
            ]
        );
    }

    #[test]
    fn pure_numeric_and_numeric_identifier_are_skipped() {
        for column in [
            Column::new("notional", ColumnType::Double),
            Column::new("qty", ColumnType::Long),
            Column::new("trade_id", ColumnType::Int),
        ] {
            assert_eq!(DimensionSynthesizer::dimension(&column), None);
        }
        assert!(DimensionSynthesizer::dimension(&Column::new("book_id", ColumnType::String)).is_some());
        assert!(DimensionSynthesizer::dimension(&Column::new("quantity", ColumnType::Int)).is_some());
    }

    #[test]
    fn dimensions_follow_declaration_order() {
        let registry = CubeDescriptionRegistry::new();
        let cube = registry.get_or_create("trades");
        DimensionSynthesizer::synthesize(
            &[
                Column::new("trade_date", date()),
                Column::new("notional", ColumnType::Double),
                Column::new("ccy", ColumnType::String),
            ],
            &cube,
        );
        let names: Vec<String> = registry
            .dimensions("trades")
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["trade_date", "ccy"]);
    }
}
