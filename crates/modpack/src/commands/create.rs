//! Create command

use anyhow::{Context, Result};
use modpack_builder::{GitCli, ModulePackager, PackageOptions, PackagedModule, YamlDescriptorCodec};
use modpack_core::SettingsLoader;
use std::fs;

use crate::cli::CreateArgs;
use crate::output;

pub async fn run(args: CreateArgs) -> Result<()> {
    let settings = SettingsLoader::new()?
        .load()
        .context("Failed to load packager settings")?;

    let packager = ModulePackager::new(
        settings,
        Box::new(YamlDescriptorCodec::new()),
        Box::new(GitCli::new()),
    )?;

    let options = PackageOptions {
        skip_verify: args.skip_verify,
        repository_path: args.repository.map(|p| p.into_std_path_buf()),
        ..Default::default()
    };

    let packaged = packager
        .package(&args.config_file, &options)
        .await
        .with_context(|| format!("Failed to package module from {}", args.config_file))?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent))?;
        }
    }
    fs::write(&args.output, &packaged.template)
        .with_context(|| format!("Failed to write module template to {}", args.output))?;

    print_summary(&packaged);
    output::success(&format!("Module template written to {}", args.output));
    Ok(())
}

fn print_summary(packaged: &PackagedModule) {
    output::header(&format!("Module: {}", packaged.config.name));
    output::kv("Version", &packaged.config.version);
    output::kv("Template", &packaged.config.template_name());
    output::kv("Resources", &packaged.descriptor.resources.len().to_string());
    output::kv("Images", &packaged.images.len().to_string());
    output::kv("Cluster scoped", &packaged.cluster_scoped.to_string());

    for image in &packaged.images {
        output::kv("Image", image);
    }

    for err in &packaged.cleanup_errors {
        output::warning(&format!("Temp file cleanup failed: {}", err));
    }
}
