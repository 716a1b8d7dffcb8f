// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Error types for workflow modelling and emission
//!
//! Every failure carries enough context (parameter, job key or path) for the
//! caller to fix the offending input without re-running with extra logging.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for flowsmith operations
pub type FlowResult<T> = Result<T, FlowError>;

/// Main error type for flowsmith
#[derive(Error, Debug, Diagnostic)]
pub enum FlowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Model Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Missing required parameter '{parameter}' for {context}")]
    #[diagnostic(
        code(flowsmith::missing_parameter),
        help("Provide a non-empty value for '{parameter}'")
    )]
    MissingParameter { context: String, parameter: String },

    #[error("Invalid {context}: {reason}")]
    #[diagnostic(code(flowsmith::invalid_model))]
    InvalidModel {
        context: String,
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Job '{job}' is defined more than once")]
    #[diagnostic(
        code(flowsmith::duplicate_job),
        help("Job keys are identifiers referenced by `needs`; pick a unique key")
    )]
    DuplicateJob { job: String },

    #[error("Job '{job}' needs unknown job '{dependency}'")]
    #[diagnostic(
        code(flowsmith::unknown_dependency),
        help("Check that '{dependency}' is added to the pipeline")
    )]
    UnknownDependency { job: String, dependency: String },

    #[error("Circular job dependency detected: {}", .jobs.join(" -> "))]
    #[diagnostic(
        code(flowsmith::circular_dependency),
        help("Review the `needs` lists of these jobs to remove the cycle")
    )]
    CircularDependency { jobs: Vec<String> },

    #[error("Pipeline '{pipeline}' failed validation with {} error(s)", .errors.len())]
    #[diagnostic(code(flowsmith::validation_failed))]
    ValidationFailed {
        pipeline: String,
        errors: Vec<String>,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to render {context}: {message}")]
    #[diagnostic(code(flowsmith::serialization))]
    Serialization { context: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to write workflow '{path}': {error}")]
    #[diagnostic(
        code(flowsmith::file_write_error),
        help("Check that the destination directory exists or can be created and is writable")
    )]
    FileWriteError { path: PathBuf, error: String },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(flowsmith::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(flowsmith::toml_error))]
    Toml { message: String },
}

impl From<toml::de::Error> for FlowError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl FlowError {
    /// Create a missing parameter error
    pub fn missing(context: &str, parameter: &str) -> Self {
        Self::MissingParameter {
            context: context.to_string(),
            parameter: parameter.to_string(),
        }
    }

    /// Create an invalid model error with an optional hint
    pub fn invalid(context: &str, reason: impl Into<String>, help: Option<String>) -> Self {
        Self::InvalidModel {
            context: context.to_string(),
            reason: reason.into(),
            help,
        }
    }

    /// Create a validation failure listing every error found
    pub fn validation_failed(pipeline: &str, errors: Vec<String>) -> Self {
        let help = if errors.is_empty() {
            None
        } else {
            Some(
                errors
                    .iter()
                    .map(|e| format!("- {}", e))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        };

        Self::ValidationFailed {
            pipeline: pipeline.to_string(),
            errors,
            help,
        }
    }
}

/// Require a non-empty string parameter, naming it on failure
pub(crate) fn required(
    context: &str,
    parameter: &str,
    value: impl Into<String>,
) -> FlowResult<String> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(FlowError::missing(context, parameter));
    }
    Ok(value)
}
