// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! flowsmith - Typed GitHub Actions workflow generator

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowsmith::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "flowsmith=debug"
    } else {
        "flowsmith=info"
    };

    // Logs go to stderr so `generate --stdout` stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Init { force } => flowsmith::cli::init::run(&cli.config, force, cli.verbose),
        Commands::Generate {
            output,
            stdout,
            template,
        } => flowsmith::cli::generate::run(&cli.config, output, stdout, &template, cli.verbose),
        Commands::Check { template } => {
            flowsmith::cli::check::run(&cli.config, &template, cli.verbose)
        }
        Commands::Graph { format, template } => {
            flowsmith::cli::graph::run(&cli.config, format, &template, cli.verbose)
        }
    }
}
