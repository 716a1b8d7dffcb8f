// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Build-and-release pipeline for a .NET project
//!
//! A `Build` job (checkout, SDK setup, restore, build, test) on every push
//! and pull request to the main branch, plus an optional `AddTag` job that
//! tags and publishes a release once a `RELEASES:` pull request is merged.

use serde::{Deserialize, Serialize};

use crate::errors::FlowResult;
use crate::workflow::{
    expressions, machines, Job, Pipeline, PullRequestEvent, PushEvent, Task, Triggers,
};

/// Parameters of the .NET pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DotNetPipelineOptions {
    /// Workflow display name
    pub name: String,
    /// Branch that triggers builds and receives release pull requests
    pub branch: String,
    /// Tag pattern that triggers builds
    pub release_tag: String,
    /// Project file holding `Version` and `PackageReleaseNotes`
    pub project_path: String,
    /// Run target of the build job
    pub build_machine: String,
    /// Run target of the tagging job
    pub release_machine: String,
    /// SDK version passed to the setup step
    pub dotnet_version: String,
    pub include_prerelease: bool,
    /// Add the release tagging job
    pub tag_job: bool,
    /// Token expression used to push tags and create releases
    pub github_token: String,
}

impl Default for DotNetPipelineOptions {
    fn default() -> Self {
        Self {
            name: ".Net".into(),
            branch: "master".into(),
            release_tag: "RELEASE".into(),
            project_path: String::new(),
            build_machine: machines::WINDOWS_2019.into(),
            release_machine: machines::UBUNTU_LATEST.into(),
            dotnet_version: "7.0.100-preview.1.22110.4".into(),
            include_prerelease: true,
            tag_job: false,
            github_token: expressions::secret("PAT_FOR_TAGGING"),
        }
    }
}

/// Job key of the build job
pub const BUILD_JOB: &str = "Build";
/// Job key of the release tagging job
pub const TAG_JOB: &str = "AddTag";

/// Assemble the .NET pipeline
pub fn dotnet_pipeline(options: &DotNetPipelineOptions) -> FlowResult<Pipeline> {
    let triggers = Triggers::new()
        .on_push(
            PushEvent::new()
                .branch(&options.branch)
                .tag(&options.release_tag),
        )
        .on_pull_request(PullRequestEvent::new().branch(&options.branch));

    let build = Job::new(&options.build_machine)?.steps([
        Task::checkout().named("Check out"),
        Task::setup_dotnet(&options.dotnet_version, options.include_prerelease)?
            .named("Setup .Net"),
        Task::restore().named("Restore"),
        Task::build().named("Build"),
        Task::test().named("Test"),
    ]);

    let mut pipeline = Pipeline::new(&options.name)?
        .with_triggers(triggers)
        .with_env(
            "IS_RELEASE_CANDIDATE",
            &expressions::is_release_candidate(&options.branch),
        )
        .with_job(BUILD_JOB, build)?;

    if options.tag_job {
        let tag = Job::tag_job(
            &options.release_machine,
            BUILD_JOB,
            &options.project_path,
            &options.github_token,
            &options.branch,
        )?;
        pipeline.add_job(TAG_JOB, tag)?;
    }

    Ok(pipeline)
}
