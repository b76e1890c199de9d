//! Type and naming classification rules.
//!
//! Every decision of the form "is this column a metric, a grouping key, an
//! identifier?" goes through [`SchemaPolicy`]. The synthesizers never test
//! type tags directly.
//!
//! | predicate            | int | long | float | double | string | date |
//! |----------------------|-----|------|-------|--------|--------|------|
//! | `is_numeric`         |  x  |  x   |   x   |   x    |        |      |
//! | `is_integer_like`    |  x  |  x   |       |        |        |      |
//! | `is_decimal`         |     |      |   x   |   x    |        |      |
//! | `is_pure_numeric`    |     |  x   |   x   |   x    |        |      |
//! | `is_indexed`         |  x  |      |       |        |   x    |  x   |

use crate::column::{Column, ColumnType};
use crate::formats::{DOUBLE_FORMAT, INTEGER_FORMAT};

/// Stateless classification policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaPolicy;

impl SchemaPolicy {
    /// Case-insensitive name suffix marking surrogate-key columns.
    pub const IDENTIFIER_SUFFIX: &'static str = "id";

    /// Prefix shared by every date-family type tag.
    pub const DATE_TYPE_PREFIX: &'static str = "DATE";

    #[must_use]
    pub const fn is_numeric(ty: &ColumnType) -> bool {
        matches!(
            ty,
            ColumnType::Int | ColumnType::Long | ColumnType::Float | ColumnType::Double
        )
    }

    /// Selects the integer formatter over the decimal one.
    #[must_use]
    pub const fn is_integer_like(ty: &ColumnType) -> bool {
        matches!(ty, ColumnType::Int | ColumnType::Long)
    }

    /// Gates the standard-deviation measure family.
    #[must_use]
    pub const fn is_decimal(ty: &ColumnType) -> bool {
        matches!(ty, ColumnType::Float | ColumnType::Double)
    }

    /// A pure metric: never a grouping key, never partitioned on.
    #[must_use]
    pub const fn is_pure_numeric(ty: &ColumnType) -> bool {
        matches!(
            ty,
            ColumnType::Long | ColumnType::Float | ColumnType::Double
        )
    }

    #[must_use]
    pub const fn is_date_type(ty: &ColumnType) -> bool {
        matches!(ty, ColumnType::Date(_))
    }

    /// Whether a raw type tag belongs to the date family.
    #[must_use]
    pub fn is_date_tag(tag: &str) -> bool {
        tag.get(..Self::DATE_TYPE_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(Self::DATE_TYPE_PREFIX))
    }

    /// Whether the column name ends with the identifier suffix, any case.
    #[must_use]
    pub fn is_identifier_column(name: &str) -> bool {
        name.len()
            .checked_sub(Self::IDENTIFIER_SUFFIX.len())
            .and_then(|start| name.get(start..))
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case(Self::IDENTIFIER_SUFFIX))
    }

    /// Dictionary-encoding hint for a physical field.
    #[must_use]
    pub const fn is_indexed(ty: &ColumnType) -> bool {
        matches!(
            ty,
            ColumnType::Int | ColumnType::String | ColumnType::Date(_)
        )
    }

    /// Numeric identifier columns are surrogate keys: neither metrics nor axes.
    #[must_use]
    pub fn is_numeric_identifier(column: &Column) -> bool {
        Self::is_numeric(&column.column_type) && Self::is_identifier_column(&column.name)
    }

    /// Receives the SUM/MIN/MAX/avg (and STD for decimals) family.
    #[must_use]
    pub fn is_measure_candidate(column: &Column) -> bool {
        Self::is_numeric(&column.column_type) && !Self::is_identifier_column(&column.name)
    }

    /// Receives a dimension and a distinct-count measure.
    #[must_use]
    pub fn is_dimension_candidate(column: &Column) -> bool {
        !Self::is_pure_numeric(&column.column_type) && !Self::is_numeric_identifier(column)
    }

    /// Eligible for the default partitioning policy.
    ///
    /// Identifier columns stay eligible: partitioning is independent of
    /// measure and dimension eligibility.
    #[must_use]
    pub const fn is_partition_candidate(ty: &ColumnType) -> bool {
        !Self::is_pure_numeric(ty)
    }

    /// Formatter for SUM/MIN/MAX style measures of a numeric column.
    #[must_use]
    pub const fn number_formatter(ty: &ColumnType) -> &'static str {
        if Self::is_integer_like(ty) {
            INTEGER_FORMAT
        } else {
            DOUBLE_FORMAT
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn date() -> ColumnType {
        ColumnType::Date("DATE[yyyy-MM-dd]".into())
    }

    #[rstest]
    #[case(ColumnType::Int, true, true, false, false)]
    #[case(ColumnType::Long, true, true, false, true)]
    #[case(ColumnType::Float, true, false, true, true)]
    #[case(ColumnType::Double, true, false, true, true)]
    #[case(ColumnType::String, false, false, false, false)]
    #[case(date(), false, false, false, false)]
    fn numeric_classification(
        #[case] ty: ColumnType,
        #[case] numeric: bool,
        #[case] integer_like: bool,
        #[case] decimal: bool,
        #[case] pure_numeric: bool,
    ) {
        assert_eq!(SchemaPolicy::is_numeric(&ty), numeric);
        assert_eq!(SchemaPolicy::is_integer_like(&ty), integer_like);
        assert_eq!(SchemaPolicy::is_decimal(&ty), decimal);
        assert_eq!(SchemaPolicy::is_pure_numeric(&ty), pure_numeric);
    }

    #[rstest]
    #[case("trade_id", true)]
    #[case("TRADEID", true)]
    #[case("TradeId", true)]
    #[case("id", true)]
    #[case("i", false)]
    #[case("", false)]
    #[case("idea", false)]
    #[case("notional", false)]
    #[case("prénomid", true)]
    fn identifier_suffix(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(SchemaPolicy::is_identifier_column(name), expected);
    }

    #[rstest]
    #[case("DATE[yyyy-MM-dd]", true)]
    #[case("date", true)]
    #[case("DAT", false)]
    #[case("string", false)]
    fn date_tags(#[case] tag: &str, #[case] expected: bool) {
        assert_eq!(SchemaPolicy::is_date_tag(tag), expected);
    }

    #[test]
    fn indexed_types() {
        assert!(SchemaPolicy::is_indexed(&ColumnType::Int));
        assert!(SchemaPolicy::is_indexed(&ColumnType::String));
        assert!(SchemaPolicy::is_indexed(&date()));
        assert!(!SchemaPolicy::is_indexed(&ColumnType::Long));
        assert!(!SchemaPolicy::is_indexed(&ColumnType::Float));
        assert!(!SchemaPolicy::is_indexed(&ColumnType::Double));
    }

    #[test]
    fn numeric_identifier_is_neither_measure_nor_dimension() {
        let column = Column::new("trade_id", ColumnType::Int);
        assert!(!SchemaPolicy::is_measure_candidate(&column));
        assert!(!SchemaPolicy::is_dimension_candidate(&column));
        assert!(SchemaPolicy::is_partition_candidate(&column.column_type));
    }

    #[test]
    fn string_identifier_is_still_a_dimension() {
        let column = Column::new("book_id", ColumnType::String);
        assert!(SchemaPolicy::is_dimension_candidate(&column));
        assert!(!SchemaPolicy::is_measure_candidate(&column));
    }

    #[test]
    fn int_column_is_both_measure_and_dimension() {
        let column = Column::new("quantity", ColumnType::Int);
        assert!(SchemaPolicy::is_measure_candidate(&column));
        assert!(SchemaPolicy::is_dimension_candidate(&column));
    }

    #[test]
    fn formatter_follows_integer_likeness() {
        assert_eq!(SchemaPolicy::number_formatter(&ColumnType::Long), INTEGER_FORMAT);
        assert_eq!(SchemaPolicy::number_formatter(&ColumnType::Float), DOUBLE_FORMAT);
    }
}
