// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Check command - validate the configured pipeline

use colored::Colorize;
use miette::Result;
use std::path::Path;

use super::{load_pipeline, TemplateArgs};
use crate::render;
use crate::workflow::{JobGraph, PipelineValidator};

/// Run the check command
pub fn run(config_path: &Path, template: &TemplateArgs, verbose: bool) -> Result<()> {
    println!("{}", "Checking pipeline...".bold());
    println!();

    let (_, pipeline) = match load_pipeline(config_path, template) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("  {} Failed to build pipeline", "✗".red());
            eprintln!();
            return Err(e);
        }
    };

    println!("  {} Pipeline model built", "✓".green());

    let validation = PipelineValidator::validate(&pipeline);

    if !validation.errors.is_empty() {
        println!();
        println!("{}:", "Errors".red().bold());
        for error in &validation.errors {
            println!("  {} {}", "✗".red(), error);
        }
    }

    if !validation.warnings.is_empty() {
        println!();
        println!("{}:", "Warnings".yellow().bold());
        for warning in &validation.warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }
    }

    if !validation.is_valid() {
        println!();
        return Err(miette::miette!(
            "Pipeline '{}' has {} error(s)",
            pipeline.name,
            validation.errors.len()
        ));
    }

    render::to_yaml(&pipeline)?;
    println!("  {} Workflow renders", "✓".green());

    if verbose {
        let graph = JobGraph::build(&pipeline)?;
        println!();
        println!("{}:", "Pipeline summary".bold());
        println!("  Name: {}", pipeline.name);
        println!("  Jobs: {}", pipeline.jobs.len());
        print!("{}", graph.to_text(&pipeline));
    }

    println!();
    if validation.has_warnings() {
        println!("{}", "✓ Pipeline is valid (with warnings)".yellow());
    } else {
        println!("{}", "✓ Pipeline is valid".green().bold());
    }

    Ok(())
}
