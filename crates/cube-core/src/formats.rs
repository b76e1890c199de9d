//! Formatter patterns understood by the query engine.

/// Default format for decimal measures.
pub const DOUBLE_FORMAT: &str = "DOUBLE[#,###.00;-#,###.00]";

/// Default format for integer measures.
pub const INTEGER_FORMAT: &str = "INT[#,###;-#,###]";

/// Default format for date levels.
pub const DATE_FORMAT: &str = "DATE[yyyy-MM-dd]";
