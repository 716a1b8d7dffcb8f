// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Graph command - visualize job dependencies

use miette::Result;
use std::path::Path;

use super::{load_pipeline, GraphFormat, TemplateArgs};
use crate::workflow::JobGraph;

/// Run the graph command
pub fn run(
    config_path: &Path,
    format: GraphFormat,
    template: &TemplateArgs,
    _verbose: bool,
) -> Result<()> {
    let (_, pipeline) = load_pipeline(config_path, template)?;

    let graph = JobGraph::build(&pipeline)?;

    let output = match format {
        GraphFormat::Text => graph.to_text(&pipeline),
        GraphFormat::Dot => graph.to_dot(),
        GraphFormat::Mermaid => graph.to_mermaid(),
    };

    println!("{}", output.trim_end());

    Ok(())
}
