// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for flowsmith.

pub mod check;
pub mod generate;
pub mod graph;
pub mod init;

use clap::{Args, Parser, Subcommand};
use miette::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{GeneratorConfig, CONFIG_FILE};
use crate::templates::dotnet_pipeline;
use crate::workflow::Pipeline;

/// Typed GitHub Actions workflow generator
///
/// Builds the .NET build-and-release workflow from flowsmith.toml and
/// command-line overrides.
#[derive(Parser, Debug)]
#[clap(
    name = "flowsmith",
    version,
    about = "Generate deterministic GitHub Actions workflows from a typed model",
    long_about = None,
    after_help = "Examples:\n\
        flowsmith init                         Write a starter flowsmith.toml\n\
        flowsmith generate                     Write the configured workflow\n\
        flowsmith generate --stdout            Print the workflow instead\n\
        flowsmith check                        Validate the configured pipeline\n\
        flowsmith graph --format mermaid       Show the job dependency graph\n\n\
        See 'flowsmith <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Configuration file
    #[clap(
        long,
        global = true,
        default_value = CONFIG_FILE,
        env = "FLOWSMITH_CONFIG",
        value_name = "FILE"
    )]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter configuration file
    Init {
        /// Overwrite an existing configuration file
        #[clap(short, long)]
        force: bool,
    },

    /// Render the workflow and write it to disk
    Generate {
        /// Destination file (defaults to `output` from the configuration)
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Print the workflow instead of writing it
        #[clap(long, conflicts_with = "output")]
        stdout: bool,

        #[clap(flatten)]
        template: TemplateArgs,
    },

    /// Validate the pipeline and report problems
    Check {
        #[clap(flatten)]
        template: TemplateArgs,
    },

    /// Show the job dependency graph
    Graph {
        /// Output format
        #[clap(short, long, default_value = "text")]
        format: GraphFormat,

        #[clap(flatten)]
        template: TemplateArgs,
    },
}

/// Overrides for the pipeline section of the configuration
#[derive(Args, Debug, Clone, Default)]
pub struct TemplateArgs {
    /// Workflow name
    #[clap(long)]
    pub name: Option<String>,

    /// Branch that triggers builds and receives release pull requests
    #[clap(long)]
    pub branch: Option<String>,

    /// Project file holding Version and PackageReleaseNotes
    #[clap(long, value_name = "PATH")]
    pub project: Option<String>,

    /// Run target of the build job
    #[clap(long, value_name = "RUNNER")]
    pub build_machine: Option<String>,

    /// .NET SDK version installed by the setup step
    #[clap(long, value_name = "VERSION")]
    pub dotnet_version: Option<String>,

    /// Add the release tagging job
    #[clap(long)]
    pub tag_job: bool,
}

impl TemplateArgs {
    /// Apply the overrides on top of a loaded configuration
    pub fn apply(&self, config: &mut GeneratorConfig) {
        let options = &mut config.pipeline;

        if let Some(name) = &self.name {
            options.name = name.clone();
        }
        if let Some(branch) = &self.branch {
            options.branch = branch.clone();
        }
        if let Some(project) = &self.project {
            options.project_path = project.clone();
        }
        if let Some(machine) = &self.build_machine {
            options.build_machine = machine.clone();
        }
        if let Some(version) = &self.dotnet_version {
            options.dotnet_version = version.clone();
        }
        if self.tag_job {
            options.tag_job = true;
        }
    }
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

impl std::str::FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "dot" => Ok(Self::Dot),
            "mermaid" => Ok(Self::Mermaid),
            _ => Err(format!("Unknown graph format: {}", s)),
        }
    }
}

/// Load the configuration, apply overrides and build the pipeline
pub(crate) fn load_pipeline(
    config_path: &Path,
    template: &TemplateArgs,
) -> Result<(GeneratorConfig, Pipeline)> {
    let mut config = GeneratorConfig::load(config_path)?;
    template.apply(&mut config);
    debug!(config = %config_path.display(), options = ?config.pipeline, "Loaded configuration");

    let pipeline = dotnet_pipeline(&config.pipeline)?;
    Ok((config, pipeline))
}
