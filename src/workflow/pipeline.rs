// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Pipeline model and triggers

use indexmap::IndexMap;

use crate::errors::{required, FlowError, FlowResult};
use crate::workflow::Job;

/// Push trigger filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushEvent {
    pub branches: Vec<String>,
    pub tags: Vec<String>,
    pub paths: Vec<String>,
}

impl PushEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branch(mut self, pattern: &str) -> Self {
        self.branches.push(pattern.to_string());
        self
    }

    pub fn tag(mut self, pattern: &str) -> Self {
        self.tags.push(pattern.to_string());
        self
    }

    pub fn path(mut self, pattern: &str) -> Self {
        self.paths.push(pattern.to_string());
        self
    }
}

/// Pull request trigger filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub branches: Vec<String>,
    /// Activity types (`opened`, `closed`, ...)
    pub types: Vec<String>,
    pub paths: Vec<String>,
}

impl PullRequestEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branch(mut self, pattern: &str) -> Self {
        self.branches.push(pattern.to_string());
        self
    }

    pub fn activity(mut self, kind: &str) -> Self {
        self.types.push(kind.to_string());
        self
    }

    pub fn path(mut self, pattern: &str) -> Self {
        self.paths.push(pattern.to_string());
        self
    }
}

/// Events that start the pipeline, rendered under `on`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triggers {
    pub push: Option<PushEvent>,
    pub pull_request: Option<PullRequestEvent>,
}

impl Triggers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_push(mut self, event: PushEvent) -> Self {
        self.push = Some(event);
        self
    }

    pub fn on_pull_request(mut self, event: PullRequestEvent) -> Self {
        self.pull_request = Some(event);
        self
    }
}

/// Top-level workflow description
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub name: String,
    pub on: Triggers,
    /// Workflow-wide variables, in insertion order
    pub env: IndexMap<String, String>,
    /// Jobs keyed by identifier, in insertion order
    pub jobs: IndexMap<String, Job>,
}

impl Pipeline {
    pub fn new(name: &str) -> FlowResult<Self> {
        Ok(Self {
            name: required("pipeline", "name", name)?,
            on: Triggers::default(),
            env: IndexMap::new(),
            jobs: IndexMap::new(),
        })
    }

    pub fn with_triggers(mut self, triggers: Triggers) -> Self {
        self.on = triggers;
        self
    }

    /// Add or replace a workflow-wide variable
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a job under a unique key
    pub fn add_job(&mut self, key: &str, job: Job) -> FlowResult<()> {
        let key = required("pipeline", "job key", key)?;
        if self.jobs.contains_key(&key) {
            return Err(FlowError::DuplicateJob { job: key });
        }
        self.jobs.insert(key, job);
        Ok(())
    }

    /// Builder form of [`Pipeline::add_job`]
    pub fn with_job(mut self, key: &str, job: Job) -> FlowResult<Self> {
        self.add_job(key, job)?;
        Ok(self)
    }

    pub fn job(&self, key: &str) -> Option<&Job> {
        self.jobs.get(key)
    }

    /// Job keys in output order
    pub fn job_keys(&self) -> Vec<&str> {
        self.jobs.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{machines, Task};

    fn job() -> Job {
        Job::new(machines::UBUNTU_LATEST).unwrap().step(Task::checkout())
    }

    #[test]
    fn test_duplicate_job_rejected() {
        let mut pipeline = Pipeline::new("ci").unwrap();
        pipeline.add_job("build", job()).unwrap();

        let err = pipeline.add_job("build", job()).unwrap_err();
        assert!(matches!(err, FlowError::DuplicateJob { ref job } if job == "build"));
    }

    #[test]
    fn test_job_keys_keep_insertion_order() {
        let pipeline = Pipeline::new("ci")
            .unwrap()
            .with_job("zeta", job())
            .unwrap()
            .with_job("alpha", job())
            .unwrap();

        assert_eq!(pipeline.job_keys(), vec!["zeta", "alpha"]);
        assert!(pipeline.job("alpha").is_some());
        assert!(pipeline.job("missing").is_none());
    }

    #[test]
    fn test_name_required() {
        assert!(matches!(
            Pipeline::new(""),
            Err(FlowError::MissingParameter { .. })
        ));
    }

    #[test]
    fn test_env_replaces_in_place() {
        let pipeline = Pipeline::new("ci")
            .unwrap()
            .with_env("A", "1")
            .with_env("B", "2")
            .with_env("A", "3");

        let entries: Vec<_> = pipeline
            .env
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(entries, vec![("A", "3"), ("B", "2")]);
    }
}
