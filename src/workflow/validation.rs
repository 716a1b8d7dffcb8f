// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Pipeline validation
//!
//! Structural checks run before a workflow is rendered. Errors block
//! emission; warnings point at expressions that will most likely evaluate
//! to an empty string on the runner.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::warn;

use crate::errors::{FlowError, FlowResult};
use crate::workflow::{Job, JobGraph, Pipeline};

const IDENTIFIER: &str = r"^[A-Za-z_][A-Za-z0-9_-]*$";
const STEPS_REFERENCE: &str = r"\bsteps\.([A-Za-z_][A-Za-z0-9_-]*)\.";
const NEEDS_REFERENCE: &str = r"\bneeds\.([A-Za-z_][A-Za-z0-9_-]*)\.";

fn identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IDENTIFIER).expect("identifier pattern"))
}

fn step_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(STEPS_REFERENCE).expect("steps pattern"))
}

fn needs_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NEEDS_REFERENCE).expect("needs pattern"))
}

/// Pipeline validator
pub struct PipelineValidator;

impl PipelineValidator {
    /// Validate a pipeline
    pub fn validate(pipeline: &Pipeline) -> ValidationResult {
        let mut result = ValidationResult::new();

        if pipeline.jobs.is_empty() {
            result.add_error("Pipeline has no jobs defined");
        }

        if pipeline.on.push.is_none() && pipeline.on.pull_request.is_none() {
            result.add_warning("Pipeline has no triggers; the runner will never start it");
        }

        for key in pipeline.jobs.keys() {
            if !identifier().is_match(key) {
                result.add_error(&format!(
                    "Job key '{}' must start with a letter or '_' and contain only \
                     alphanumerics, '-' or '_'",
                    key
                ));
            }
        }

        // Unknown `needs` and cycles
        match JobGraph::build(pipeline) {
            Ok(_) => {}
            Err(FlowError::CircularDependency { jobs }) => {
                result.add_error(&format!("Circular dependency: {}", jobs.join(" -> ")));
            }
            Err(FlowError::UnknownDependency { job, dependency }) => {
                result.add_error(&format!(
                    "Job '{}' needs unknown job '{}'",
                    job, dependency
                ));
            }
            Err(e) => {
                result.add_error(&format!("Dependency graph error: {}", e));
            }
        }

        for (key, job) in &pipeline.jobs {
            Self::validate_job(key, job, &mut result);
        }

        result
    }

    /// Validate and turn errors into a [`FlowError::ValidationFailed`]
    pub fn ensure_valid(pipeline: &Pipeline) -> FlowResult<ValidationResult> {
        let result = Self::validate(pipeline);

        for warning in &result.warnings {
            warn!(pipeline = %pipeline.name, "{}", warning);
        }

        if result.is_valid() {
            Ok(result)
        } else {
            Err(FlowError::validation_failed(&pipeline.name, result.errors))
        }
    }

    fn validate_job(key: &str, job: &Job, result: &mut ValidationResult) {
        if job.steps.is_empty() {
            result.add_error(&format!("Job '{}' has no steps", key));
        }

        for dependency in needs_reference()
            .captures_iter(&job.condition)
            .filter_map(|c| c.get(1))
        {
            if !job.needs.iter().any(|n| n == dependency.as_str()) {
                result.add_warning(&format!(
                    "Job '{}': condition references needs.{} but the job does not declare it",
                    key,
                    dependency.as_str()
                ));
            }
        }

        let mut seen_ids: HashSet<String> = HashSet::new();

        for (index, task) in job.steps.iter().enumerate() {
            let step = task.to_step();
            let label = if step.name.is_empty() {
                format!("step {}", index + 1)
            } else {
                format!("step '{}'", step.name)
            };

            let mut texts = vec![step.condition.clone(), step.run.clone()];
            texts.extend(step.with.values().filter_map(|v| v.as_str().map(String::from)));
            texts.extend(step.env.values().cloned());

            for text in &texts {
                for reference in step_reference().captures_iter(text).filter_map(|c| c.get(1)) {
                    if !seen_ids.contains(reference.as_str()) {
                        result.add_warning(&format!(
                            "Job '{}', {}: references steps.{} which is not an earlier step id",
                            key,
                            label,
                            reference.as_str()
                        ));
                    }
                }

                for reference in needs_reference().captures_iter(text).filter_map(|c| c.get(1)) {
                    if !job.needs.iter().any(|n| n == reference.as_str()) {
                        result.add_warning(&format!(
                            "Job '{}', {}: references needs.{} but the job does not declare it",
                            key,
                            label,
                            reference.as_str()
                        ));
                    }
                }
            }

            if step.id.is_empty() {
                continue;
            }

            if !identifier().is_match(&step.id) {
                result.add_error(&format!(
                    "Job '{}', {}: id '{}' is not a valid identifier",
                    key, label, step.id
                ));
            }

            if !seen_ids.insert(step.id.clone()) {
                result.add_error(&format!(
                    "Job '{}': duplicate step id '{}'",
                    key, step.id
                ));
            }
        }
    }
}

/// Result of pipeline validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
