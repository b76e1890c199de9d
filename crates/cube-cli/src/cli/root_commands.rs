use std::path::PathBuf;

use clap::{Args, Subcommand};
use cube_core::AggregateMode;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Discover every configured source and print the generated model.
    Generate(GenerateArgs),
    /// Synthesize one store from an inline column list.
    Inspect(InspectArgs),
    /// Print the JSON Schema of a produced type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    /// Write the model to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct InspectArgs {
    /// Store name.
    #[arg(short, long)]
    pub store: String,

    /// Column as `name:type`, repeatable, in declaration order.
    #[arg(short = 'c', long = "column", required = true, value_parser = parse_column)]
    pub columns: Vec<(String, String)>,

    /// Partition field override.
    #[arg(long)]
    pub partition_field: Option<String>,

    /// Query-result cache size.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub cache_size: Option<u32>,

    /// JUST_IN_TIME or BITMAP.
    #[arg(long, default_value = "JUST_IN_TIME")]
    pub aggregate_mode: AggregateMode,

    /// Available-parallelism hint (defaults to the number of cores).
    #[arg(long)]
    pub parallelism: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Registered schema name.
    #[arg(required_unless_present = "list")]
    pub name: Option<String>,

    /// List registered schema names.
    #[arg(long, conflicts_with = "name")]
    pub list: bool,
}

/// Split `name:type` at the first colon; date types may contain colons.
fn parse_column(raw: &str) -> Result<(String, String), String> {
    let (name, type_tag) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected name:type, got '{raw}'"))?;
    let (name, type_tag) = (name.trim(), type_tag.trim());
    if name.is_empty() || type_tag.is_empty() {
        return Err(format!("expected name:type, got '{raw}'"));
    }
    Ok((name.to_string(), type_tag.to_string()))
}
