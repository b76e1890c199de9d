//! Physical record layout synthesis.

use cube_core::{
    Column, CoreError, DatePart, FieldDescriptor, Partitioning, SchemaPolicy, StoreDescription,
    StoreSpec,
};

/// Expands a column list into the physical field list of a store.
///
/// Every date column is preceded by its three synthetic parts
/// (`.YEAR`, `.MONTH`, `.DAY`). Int, string and date fields are indexed;
/// long, float and double fields never are.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordSchemaSynthesizer;

impl RecordSchemaSynthesizer {
    /// # Errors
    ///
    /// [`CoreError::InvalidColumn`] for a blank column name.
    pub fn fields(columns: &[Column]) -> Result<Vec<FieldDescriptor>, CoreError> {
        let mut fields = Vec::with_capacity(columns.len());
        for column in columns {
            if column.name.trim().is_empty() {
                return Err(CoreError::InvalidColumn {
                    name: column.name.clone(),
                    type_tag: column.column_type.to_string(),
                });
            }
            if SchemaPolicy::is_date_type(&column.column_type) {
                fields.extend(
                    DatePart::ALL
                        .iter()
                        .map(|part| FieldDescriptor::date_part(&column.name, *part)),
                );
            }
            fields.push(FieldDescriptor {
                name: column.name.clone(),
                field_type: column.column_type.clone(),
                indexed: SchemaPolicy::is_indexed(&column.column_type),
                derived: None,
            });
        }
        Ok(fields)
    }

    /// # Errors
    ///
    /// See [`Self::fields`].
    pub fn describe(
        spec: &StoreSpec,
        partitioning: Option<Partitioning>,
    ) -> Result<StoreDescription, CoreError> {
        Ok(StoreDescription {
            name: spec.store_name.clone(),
            fields: Self::fields(spec.columns())?,
            partitioning,
        })
    }

    /// Fields a cube selects from its base store: each column, followed for
    /// dates by its year, month and day.
    pub fn selection_fields(columns: &[Column]) -> Vec<String> {
        let mut fields = Vec::with_capacity(columns.len());
        for column in columns {
            fields.push(column.name.clone());
            if SchemaPolicy::is_date_type(&column.column_type) {
                fields.extend(DatePart::ALL.iter().map(|part| part.field_name(&column.name)));
            }
        }
        fields
    }
}
