use anyhow::Context;
use cube_config::GeneralConfig;
use cube_core::{CubeDescription, StoreDescription, StoreSpec, Warning};
use cube_synth::{CubeDescriptionRegistry, Synthesizer};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InspectArgs;
use crate::output;

#[derive(Debug, Serialize)]
struct InspectResponse {
    store: StoreDescription,
    selection: Vec<String>,
    cube: CubeDescription,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<Warning>,
}

/// Handle `autocube inspect`.
pub fn handle(args: &InspectArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = inspect(args)?;
    output::output(&response, flags.format)
}

fn inspect(args: &InspectArgs) -> anyhow::Result<InspectResponse> {
    let spec = build_spec(args)?;
    let general = GeneralConfig {
        parallelism: args.parallelism,
        ..GeneralConfig::default()
    };

    let registry = CubeDescriptionRegistry::new();
    let outcome = Synthesizer::new(general.effective_parallelism())
        .synthesize(&spec, &registry)
        .with_context(|| format!("failed to synthesize store '{}'", spec.store_name))?;
    let cube = registry
        .get(&spec.store_name)
        .map(|handle| handle.snapshot())
        .with_context(|| format!("no cube registered for '{}'", spec.store_name))?;

    Ok(InspectResponse {
        store: outcome.store,
        selection: outcome.selection,
        cube,
        warnings: outcome.warnings,
    })
}

fn build_spec(args: &InspectArgs) -> anyhow::Result<StoreSpec> {
    let mut builder = StoreSpec::builder(args.store.as_str())
        .cache_size(args.cache_size)
        .aggregate_mode(args.aggregate_mode);
    if let Some(field) = &args.partition_field {
        builder = builder.partition_field(field.as_str());
    }
    for (name, type_tag) in &args.columns {
        builder = builder
            .add_column(name, type_tag)
            .with_context(|| format!("invalid column '{name}:{type_tag}'"))?;
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use cube_core::{AggregateMode, MeasureSpec};
    use pretty_assertions::assert_eq;

    use super::inspect;
    use crate::cli::root_commands::InspectArgs;

    fn args(columns: &[(&str, &str)]) -> InspectArgs {
        InspectArgs {
            store: "trades".into(),
            columns: columns
                .iter()
                .map(|(name, ty)| ((*name).to_string(), (*ty).to_string()))
                .collect(),
            partition_field: None,
            cache_size: Some(50),
            aggregate_mode: AggregateMode::Bitmap,
            parallelism: Some(8),
        }
    }

    #[test]
    fn inspect_builds_store_and_cube() {
        let response = inspect(&args(&[
            ("trade_id", "int"),
            ("book", "string"),
            ("notional", "double"),
        ]))
        .unwrap();

        assert_eq!(response.selection, vec!["trade_id", "book", "notional"]);
        assert_eq!(response.cube.name, "trades");
        assert_eq!(response.cube.aggregate_mode, AggregateMode::Bitmap);
        assert_eq!(response.cube.cache.as_ref().map(|cache| cache.size), Some(50));
        assert!(response.cube.dimension("book").is_some());
        assert!(response.cube.dimension("trade_id").is_none());
        assert!(matches!(
            response.cube.measure("notional.SUM"),
            Some(MeasureSpec::Aggregated(_))
        ));
        assert!(response.warnings.is_empty());
    }

    #[test]
    fn unknown_partition_override_is_reported() {
        let mut args = args(&[("book", "string"), ("notional", "double")]);
        args.partition_field = Some("desk".into());
        let response = inspect(&args).unwrap();
        assert_eq!(response.warnings.len(), 1);
    }

    #[test]
    fn unknown_column_type_fails() {
        let err = inspect(&args(&[("flag", "boolean")])).unwrap_err();
        assert!(format!("{err:#}").contains("flag:boolean"));
    }
}
