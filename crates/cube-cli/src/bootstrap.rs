use std::path::{Path, PathBuf};

use anyhow::Context;
use cube_config::AutoCubeConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered configuration.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<AutoCubeConfig> {
    load_dotenv(flags)?;
    AutoCubeConfig::load_from(flags.config.as_deref())
        .context("failed to load autocube configuration")
}

/// Directory that relative source paths resolve against: the explicit
/// config file's directory, else the current directory.
pub fn base_dir(flags: &GlobalFlags) -> anyhow::Result<PathBuf> {
    if let Some(parent) = flags
        .config
        .as_deref()
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        return Ok(parent.to_path_buf());
    }
    std::env::current_dir().context("failed to determine current directory")
}

fn load_dotenv(flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = base_dir(flags)?;
    let env_path = root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            return Err(anyhow::Error::new(error).context("failed to load dotenv file"));
        }
    }
    Ok(())
}
