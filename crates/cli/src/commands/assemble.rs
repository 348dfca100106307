use crate::Format;
use anyhow::Context;
use kernel_core::{assemble, BootstrapConfig, BootstrapConfigTrait};
use serde::Serialize;
use std::path::Path;

/// Assemble (and optionally compile) the container and render it
pub fn run(install_dir: &Path, compile: bool, format: Format) -> anyhow::Result<String> {
    let config = BootstrapConfig::from_env()?;
    config.validate()?;

    tracing::info!("Assembling container from {}", install_dir.display());
    let container = assemble(install_dir, &config)
        .with_context(|| format!("Failed to assemble container from {}", install_dir.display()))?;

    if compile {
        let compiled = container.compile().context("Failed to compile container")?;
        render(&compiled.dump(), format)
    } else {
        render(&container.dump(), format)
    }
}

fn render<T: Serialize>(value: &T, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    })
}
