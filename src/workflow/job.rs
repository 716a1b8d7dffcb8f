// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Job model

use indexmap::IndexMap;

use crate::errors::{required, FlowResult};
use crate::workflow::{expressions, CheckoutVersion, Task};

/// Default shell and working directory for `run` steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDefaults {
    pub shell: String,
    pub working_directory: String,
}

/// Job-level defaults block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDefaults {
    pub run: Option<RunDefaults>,
}

/// Matrix strategy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Strategy {
    pub matrix: IndexMap<String, Vec<String>>,
    /// `None` leaves the runner's default in place
    pub fail_fast: Option<bool>,
    pub max_parallel: u32,
}

impl Strategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a matrix dimension
    pub fn with_axis<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matrix
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = Some(enabled);
        self
    }

    pub fn max_parallel(mut self, jobs: u32) -> Self {
        self.max_parallel = jobs;
        self
    }
}

/// A named unit of work: run target, dependencies, guard and steps
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub name: String,
    /// Run target, rendered as `runs-on`
    pub runs_on: String,
    /// Keys of jobs that must finish first, in declared order
    pub needs: Vec<String>,
    /// Guard expression, rendered as `if`
    pub condition: String,
    /// Deployment environment name
    pub environment: String,
    pub defaults: Option<JobDefaults>,
    pub steps: Vec<Task>,
    pub timeout_minutes: u32,
    pub strategy: Option<Strategy>,
    pub env: IndexMap<String, String>,
    pub outputs: IndexMap<String, String>,
}

impl Job {
    /// Create an empty job for a run target
    pub fn new(runs_on: &str) -> FlowResult<Self> {
        Ok(Self {
            name: String::new(),
            runs_on: required("job", "runs_on", runs_on)?,
            needs: Vec::new(),
            condition: String::new(),
            environment: String::new(),
            defaults: None,
            steps: Vec::new(),
            timeout_minutes: 0,
            strategy: None,
            env: IndexMap::new(),
            outputs: IndexMap::new(),
        })
    }

    /// Set the display name
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Declare a dependency on another job
    pub fn needs(mut self, job: &str) -> FlowResult<Self> {
        let job = required("job", "needs", job)?;
        if !self.needs.contains(&job) {
            self.needs.push(job);
        }
        Ok(self)
    }

    /// Guard the job with an `if` expression
    pub fn when(mut self, condition: &str) -> FlowResult<Self> {
        self.condition = required("job", "condition", condition)?;
        Ok(self)
    }

    /// Bind the job to a deployment environment
    pub fn in_environment(mut self, environment: &str) -> FlowResult<Self> {
        self.environment = required("job", "environment", environment)?;
        Ok(self)
    }

    /// Set the default shell and working directory for `run` steps
    pub fn with_run_defaults(mut self, shell: &str, working_directory: &str) -> Self {
        self.defaults = Some(JobDefaults {
            run: Some(RunDefaults {
                shell: shell.to_string(),
                working_directory: working_directory.to_string(),
            }),
        });
        self
    }

    /// Append a step
    pub fn step(mut self, task: Task) -> Self {
        self.steps.push(task);
        self
    }

    /// Append several steps in order
    pub fn steps<I: IntoIterator<Item = Task>>(mut self, tasks: I) -> Self {
        self.steps.extend(tasks);
        self
    }

    pub fn timeout(mut self, minutes: u32) -> Self {
        self.timeout_minutes = minutes;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Add or replace an environment variable
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Expose a value to dependent jobs
    pub fn with_output(mut self, key: &str, value: &str) -> Self {
        self.outputs.insert(key.to_string(), value.to_string());
        self
    }

    /// The release tagging job
    ///
    /// Runs after `depends_on` succeeds on a merged `RELEASES:` pull request
    /// into `branch`. Reads `Version` and `PackageReleaseNotes` from the
    /// project file, then tags and publishes the release. Step order is
    /// fixed: each step only consumes outputs produced by earlier ones.
    pub fn tag_job(
        runs_on: &str,
        depends_on: &str,
        project_path: &str,
        github_token: &str,
        branch: &str,
    ) -> FlowResult<Self> {
        let context = "tag job";
        let depends_on = required(context, "depends_on", depends_on)?;
        let project_path = required(context, "project_path", project_path)?;
        let github_token = required(context, "github_token", github_token)?;
        let branch = required(context, "branch", branch)?;

        let version = expressions::step_output("extract_version", "version_number");
        let notes =
            expressions::step_output("extract_package_release_notes", "package_release_notes");
        let tag_name = format!("v{}", version);
        let release_name = format!("Release - v{}", version);

        let steps = vec![
            Task::checkout_version(CheckoutVersion::V3)
                .named("Checkout code")
                .with_input("token", &github_token)?,
            Task::configure_git().named("Configure Git"),
            Task::extract_property(
                "extract_version",
                &project_path,
                "Version",
                "version_number",
                runs_on,
            )?
            .named("Extract Version"),
            Task::run(&format!("echo \"Version number: {}\"", version))?
                .named("Display Version"),
            Task::extract_property(
                "extract_package_release_notes",
                &project_path,
                "PackageReleaseNotes",
                "package_release_notes",
                runs_on,
            )?
            .named("Extract Package Release Notes"),
            Task::run(&format!("echo \"Package Release Notes: {}\"", notes))?
                .named("Display Package Release Notes"),
            Task::create_tag(&tag_name, &release_name)?.named("Create GitHub Tag"),
            Task::create_release(&release_name, &tag_name, &notes, &github_token)?
                .named("Create GitHub Release"),
        ];

        Ok(Self::new(runs_on)?
            .needs(&depends_on)?
            .when(&expressions::release_gate(&depends_on, &branch))?
            .steps(steps))
    }
}
