// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Init command - write a starter configuration

use colored::Colorize;
use miette::Result;
use std::path::Path;

use crate::config::GeneratorConfig;

/// Run the init command
pub fn run(config_path: &Path, force: bool, verbose: bool) -> Result<()> {
    println!("{}", "Initializing flowsmith...".bold());
    println!();

    if config_path.exists() && !force {
        return Err(miette::miette!(
            help = "Pass --force to replace it.",
            "{} already exists",
            config_path.display()
        ));
    }

    let config = GeneratorConfig::default();
    let content = config.to_toml()?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            miette::miette!("Failed to create directory '{}': {}", parent.display(), e)
        })?;
    }

    std::fs::write(config_path, &content).map_err(|e| {
        miette::miette!("Failed to write {}: {}", config_path.display(), e)
    })?;

    println!("  {} Created {}", "✓".green(), config_path.display());

    if verbose {
        println!();
        println!("{}", content.dimmed());
    }

    println!();
    println!("{}", "Next steps:".bold());
    println!("  1. Set {} to your project file", "pipeline.project_path".cyan());
    println!("  2. Run {} to preview the workflow", "flowsmith generate --stdout".cyan());
    println!(
        "  3. Run {} to write {}",
        "flowsmith generate".cyan(),
        config.output.display()
    );

    Ok(())
}
