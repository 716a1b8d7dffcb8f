// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Emission client
//!
//! Validates a pipeline, renders it fully in memory and only then touches
//! the filesystem. The file is written to a temporary sibling and renamed
//! over the destination, so a failed run never leaves a truncated workflow.

use std::fs::Permissions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{FlowError, FlowResult};
use crate::render;
use crate::workflow::{Pipeline, PipelineValidator};

/// Renders pipelines and writes them to disk
#[derive(Debug, Clone, Default)]
pub struct WorkflowClient {
    /// Skip structural validation before rendering
    skip_validation: bool,
}

impl WorkflowClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render without running [`PipelineValidator`] first
    pub fn without_validation(mut self) -> Self {
        self.skip_validation = true;
        self
    }

    /// Validate and render a pipeline to YAML
    pub fn render(&self, pipeline: &Pipeline) -> FlowResult<String> {
        if !self.skip_validation {
            PipelineValidator::ensure_valid(pipeline)?;
        }
        render::to_yaml(pipeline)
    }

    /// Validate, render and write a pipeline to `destination`
    ///
    /// Creates missing parent directories and replaces an existing file.
    pub fn emit(&self, pipeline: &Pipeline, destination: &Path) -> FlowResult<()> {
        let yaml = self.render(pipeline)?;
        write_atomically(destination, yaml.as_bytes())?;

        info!(
            pipeline = %pipeline.name,
            path = %destination.display(),
            "Wrote workflow"
        );
        Ok(())
    }
}

/// Render and write a pipeline with the default client
pub fn emit(pipeline: &Pipeline, destination: impl AsRef<Path>) -> FlowResult<()> {
    WorkflowClient::new().emit(pipeline, destination.as_ref())
}

fn write_atomically(destination: &Path, contents: &[u8]) -> FlowResult<()> {
    let write_error = |error: String| FlowError::FileWriteError {
        path: destination.to_path_buf(),
        error,
    };

    let parent = match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if destination.is_dir() {
        return Err(write_error("destination is a directory".into()));
    }

    std::fs::create_dir_all(&parent).map_err(|e| write_error(e.to_string()))?;

    let mut file = NamedTempFile::new_in(&parent).map_err(|e| write_error(e.to_string()))?;
    debug!(temp = %file.path().display(), "Staging workflow");

    file.write_all(contents)
        .and_then(|_| file.flush())
        .map_err(|e| write_error(e.to_string()))?;

    // The staged file is owner-only; give it the mode of the file it replaces
    let permissions = match std::fs::metadata(destination) {
        Ok(existing) => Some(existing.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| write_error(e.to_string()))?;
    }

    file.persist(destination)
        .map_err(|e| write_error(e.error.to_string()))?;

    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
