use anyhow::Context;
use cube_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output;

/// Handle `autocube schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    if args.list {
        return output::output(&registry.list(), flags.format);
    }

    let name = args.name.as_deref().context("a schema name or --list is required")?;
    let schema = registry.get(name).with_context(|| {
        format!(
            "unknown schema '{name}'; available: {}",
            registry.list().join(", ")
        )
    })?;
    output::output(schema, flags.format)
}
