use std::fs;

use anyhow::Context;
use cube_discovery::ManifestDiscovery;
use cube_schema::SchemaRegistry;
use cube_synth::Generator;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::GenerateArgs;
use crate::output;

/// Handle `autocube generate`.
pub fn handle(args: &GenerateArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags)?;
    let discovery = ManifestDiscovery::new().with_base_dir(bootstrap::base_dir(flags)?);

    let model = Generator::from_config(discovery, &config)
        .generate(&config)
        .context("schema generation failed")?;

    for warning in &model.warnings {
        tracing::warn!(%warning, "generation warning");
    }

    let value = serde_json::to_value(&model)?;
    SchemaRegistry::new()
        .validate("generated_model", &value)
        .context("generated model does not match its schema")?;

    match &args.output {
        Some(path) => {
            let rendered = output::render(&value, flags.format)?;
            fs::write(path, rendered + "\n")
                .with_context(|| format!("failed to write model to {}", path.display()))?;
            tracing::info!(path = %path.display(), "model written");
            Ok(())
        }
        None => output::output(&value, flags.format),
    }
}
