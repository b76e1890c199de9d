//! Partition field and partition count selection.

use cube_core::{Partitioning, SchemaPolicy, StoreSpec, Warning};

/// The outcome of [`PartitioningSelector::select`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionChoice {
    pub partitioning: Option<Partitioning>,
    /// Raised when the configured override matched no column.
    pub warning: Option<Warning>,
}

/// Picks a modulo partitioning from an available-parallelism hint.
///
/// The partition count is half the hint. Below two partitions the store is
/// left unpartitioned, whatever the override says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitioningSelector {
    parallelism: usize,
}

impl PartitioningSelector {
    pub const fn new(parallelism: usize) -> Self {
        Self { parallelism }
    }

    pub fn partition_count(&self) -> u32 {
        u32::try_from(self.parallelism / 2).unwrap_or(u32::MAX)
    }

    pub fn select(&self, spec: &StoreSpec) -> PartitionChoice {
        let partition_count = self.partition_count();
        if partition_count <= 1 {
            return PartitionChoice::default();
        }

        let mut warning = None;
        if let Some(requested) = spec.partition_override() {
            if let Some(column) = spec.find_column(requested) {
                tracing::info!(
                    store = %spec.store_name,
                    field = %column.name,
                    partition_count,
                    "applying configured partitioning"
                );
                return PartitionChoice {
                    partitioning: Some(Partitioning {
                        field: column.name.clone(),
                        partition_count,
                    }),
                    warning: None,
                };
            }
            let unknown = Warning::UnknownPartitionField {
                store: spec.store_name.clone(),
                field: requested.to_string(),
            };
            tracing::warn!(store = %spec.store_name, "{unknown}");
            warning = Some(unknown);
        }

        let partitioning = spec
            .columns()
            .iter()
            .find(|column| SchemaPolicy::is_partition_candidate(&column.column_type))
            .map(|column| {
                tracing::info!(
                    store = %spec.store_name,
                    field = %column.name,
                    partition_count,
                    "applying default partitioning policy"
                );
                Partitioning {
                    field: column.name.clone(),
                    partition_count,
                }
            });

        PartitionChoice {
            partitioning,
            warning,
        }
    }
}
