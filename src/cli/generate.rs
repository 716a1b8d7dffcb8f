// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Generate command - render and write the workflow

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};

use super::{load_pipeline, TemplateArgs};
use crate::client::WorkflowClient;

/// Run the generate command
pub fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    stdout: bool,
    template: &TemplateArgs,
    verbose: bool,
) -> Result<()> {
    let (config, pipeline) = load_pipeline(config_path, template)?;
    let client = WorkflowClient::new();

    if stdout {
        let yaml = client.render(&pipeline)?;
        print!("{}", yaml);
        return Ok(());
    }

    let destination = output.unwrap_or(config.output);
    client.emit(&pipeline, &destination)?;

    println!(
        "  {} Wrote {} ({} jobs)",
        "✓".green(),
        destination.display().to_string().bold(),
        pipeline.jobs.len()
    );

    if verbose {
        for (key, job) in &pipeline.jobs {
            println!(
                "    {} {} on {}: {} steps",
                "→".blue(),
                key,
                job.runs_on,
                job.steps.len()
            );
        }
    }

    Ok(())
}
