// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! End-to-end rendering of whole pipelines

use flowsmith::templates::{dotnet_pipeline, DotNetPipelineOptions, BUILD_JOB, TAG_JOB};
use flowsmith::workflow::{machines, PushEvent, Triggers};
use flowsmith::{FlowError, Job, Pipeline, Task, WorkflowClient};
use serde_yaml::Value;

fn render(pipeline: &Pipeline) -> String {
    WorkflowClient::new().render(pipeline).unwrap()
}

fn parse(yaml: &str) -> Value {
    serde_yaml::from_str(yaml).unwrap()
}

fn keys(value: &Value) -> Vec<String> {
    value
        .as_mapping()
        .unwrap()
        .keys()
        .map(|k| k.as_str().unwrap().to_string())
        .collect()
}

fn strings(value: &Value) -> Vec<&str> {
    value
        .as_sequence()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect()
}

fn dotnet() -> Pipeline {
    dotnet_pipeline(&DotNetPipelineOptions::default()).unwrap()
}

#[test]
fn dotnet_pipeline_renders_triggers_and_build_steps() {
    let doc = parse(&render(&dotnet()));

    assert_eq!(doc["name"].as_str(), Some(".Net"));
    assert_eq!(strings(&doc["on"]["push"]["branches"]), vec!["master"]);
    assert_eq!(strings(&doc["on"]["push"]["tags"]), vec!["RELEASE"]);
    assert_eq!(strings(&doc["on"]["pull_request"]["branches"]), vec!["master"]);

    let build = &doc["jobs"][BUILD_JOB];
    assert_eq!(build["runs-on"].as_str(), Some(machines::WINDOWS_2019));

    let steps = build["steps"].as_sequence().unwrap();
    let names: Vec<&str> = steps.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["Check out", "Setup .Net", "Restore", "Build", "Test"]
    );

    let setup = &steps[1];
    assert_eq!(setup["uses"].as_str(), Some("actions/setup-dotnet@v1"));
    assert_eq!(
        setup["with"]["dotnet-version"].as_str(),
        Some("7.0.100-preview.1.22110.4")
    );
    assert_eq!(setup["with"]["include-prerelease"].as_bool(), Some(true));

    assert_eq!(steps[2]["run"].as_str(), Some("dotnet restore"));
}

#[test]
fn top_level_keys_follow_fixed_order() {
    let doc = parse(&render(&dotnet()));
    assert_eq!(keys(&doc), vec!["name", "on", "env", "jobs"]);

    let build = &doc["jobs"][BUILD_JOB];
    assert_eq!(keys(build), vec!["runs-on", "steps"]);
}

#[test]
fn rendering_is_deterministic() {
    let pipeline = dotnet_pipeline(&DotNetPipelineOptions {
        tag_job: true,
        project_path: "App/App.csproj".into(),
        ..DotNetPipelineOptions::default()
    })
    .unwrap();

    let first = render(&pipeline);
    let second = render(&pipeline);
    let rebuilt = render(&pipeline.clone());

    assert_eq!(first, second);
    assert_eq!(first, rebuilt);
}

#[test]
fn tag_task_keeps_name_and_message_verbatim() {
    let pipeline = Pipeline::new("release")
        .unwrap()
        .with_triggers(Triggers::new().on_push(PushEvent::new().tag("v*")))
        .with_job(
            "tag",
            Job::new(machines::UBUNTU_LATEST)
                .unwrap()
                .step(Task::create_tag("v1.2.3", "Release - v1.2.3").unwrap()),
        )
        .unwrap();

    let doc = parse(&render(&pipeline));
    let run = doc["jobs"]["tag"]["steps"][0]["run"].as_str().unwrap();

    assert!(run.contains("v1.2.3"));
    assert!(run.contains("Release - v1.2.3"));
    assert!(run.contains("git push origin --tags"));
}

#[test]
fn unset_optional_fields_are_omitted() {
    let pipeline = Pipeline::new("ci")
        .unwrap()
        .with_triggers(Triggers::new().on_push(PushEvent::new().branch("main")))
        .with_job(
            "build",
            Job::new(machines::UBUNTU_LATEST)
                .unwrap()
                .step(Task::run("make").unwrap()),
        )
        .unwrap();

    let yaml = render(&pipeline);
    let doc = parse(&yaml);

    assert_eq!(keys(&doc), vec!["name", "on", "jobs"]);
    assert_eq!(keys(&doc["jobs"]["build"]["steps"][0]), vec!["run"]);
    assert!(!yaml.contains("timeout-minutes"));
    assert!(!yaml.contains("continue-on-error"));
    assert!(!yaml.contains("needs"));
}

#[test]
fn job_and_step_keys_use_runner_aliases() {
    let job = Job::new(machines::UBUNTU_LATEST)
        .unwrap()
        .named("Release")
        .needs("build")
        .unwrap()
        .when("github.ref == 'refs/heads/main'")
        .unwrap()
        .timeout(30)
        .with_run_defaults("bash", "src")
        .step(
            Task::run("make release")
                .unwrap()
                .with_id("release")
                .unwrap()
                .continue_on_error()
                .timeout(10),
        );

    let pipeline = Pipeline::new("ci")
        .unwrap()
        .with_triggers(Triggers::new().on_push(PushEvent::new().branch("main")))
        .with_job(
            "build",
            Job::new(machines::UBUNTU_LATEST)
                .unwrap()
                .step(Task::build()),
        )
        .unwrap()
        .with_job("release", job)
        .unwrap();

    let doc = parse(&render(&pipeline));
    let release = &doc["jobs"]["release"];

    assert_eq!(
        keys(release),
        vec![
            "name",
            "runs-on",
            "needs",
            "if",
            "defaults",
            "steps",
            "timeout-minutes"
        ]
    );
    assert_eq!(release["defaults"]["run"]["working-directory"].as_str(), Some("src"));

    let step = &release["steps"][0];
    assert_eq!(
        keys(step),
        vec!["id", "run", "continue-on-error", "timeout-minutes"]
    );
    assert_eq!(step["continue-on-error"].as_bool(), Some(true));
    assert_eq!(step["timeout-minutes"].as_u64(), Some(10));
}

#[test]
fn needs_render_in_declared_order() {
    let deploy = Job::new(machines::UBUNTU_LATEST)
        .unwrap()
        .needs("test")
        .unwrap()
        .needs("lint")
        .unwrap()
        .step(Task::run("./deploy.sh").unwrap());

    let pipeline = Pipeline::new("ci")
        .unwrap()
        .with_triggers(Triggers::new().on_push(PushEvent::new().branch("main")))
        .with_job("lint", Job::new(machines::UBUNTU_LATEST).unwrap().step(Task::build()))
        .unwrap()
        .with_job("test", Job::new(machines::UBUNTU_LATEST).unwrap().step(Task::test()))
        .unwrap()
        .with_job("deploy", deploy)
        .unwrap();

    let doc = parse(&render(&pipeline));
    assert_eq!(strings(&doc["jobs"]["deploy"]["needs"]), vec!["test", "lint"]);
    assert_eq!(keys(&doc["jobs"]), vec!["lint", "test", "deploy"]);
}

#[test]
fn tag_job_renders_release_flow() {
    let pipeline = dotnet_pipeline(&DotNetPipelineOptions {
        tag_job: true,
        project_path: "App/App.csproj".into(),
        ..DotNetPipelineOptions::default()
    })
    .unwrap();

    let doc = parse(&render(&pipeline));
    let tag = &doc["jobs"][TAG_JOB];

    assert_eq!(tag["runs-on"].as_str(), Some(machines::UBUNTU_LATEST));
    assert_eq!(strings(&tag["needs"]), vec![BUILD_JOB]);

    let gate = tag["if"].as_str().unwrap();
    assert!(gate.starts_with("needs.Build.result == 'success'"));
    assert_eq!(gate.lines().count(), 5);

    let steps = tag["steps"].as_sequence().unwrap();
    assert_eq!(steps.len(), 8);
    assert_eq!(steps[0]["uses"].as_str(), Some("actions/checkout@v3"));
    assert_eq!(steps[2]["id"].as_str(), Some("extract_version"));
    assert_eq!(steps[2]["shell"].as_str(), Some("bash"));

    let release = &steps[7];
    assert_eq!(release["uses"].as_str(), Some("actions/create-release@v1"));
    assert_eq!(
        release["with"]["tag_name"].as_str(),
        Some("v${{ steps.extract_version.outputs.version_number }}")
    );
    assert_eq!(release["with"]["draft"].as_bool(), Some(false));
    assert_eq!(
        release["env"]["GITHUB_TOKEN"].as_str(),
        Some("${{ secrets.PAT_FOR_TAGGING }}")
    );
}

#[test]
fn circular_needs_are_rejected_before_rendering() {
    let pipeline = Pipeline::new("ci")
        .unwrap()
        .with_job(
            "a",
            Job::new(machines::UBUNTU_LATEST)
                .unwrap()
                .needs("b")
                .unwrap()
                .step(Task::build()),
        )
        .unwrap()
        .with_job(
            "b",
            Job::new(machines::UBUNTU_LATEST)
                .unwrap()
                .needs("a")
                .unwrap()
                .step(Task::build()),
        )
        .unwrap();

    let err = WorkflowClient::new().render(&pipeline).unwrap_err();
    assert!(matches!(err, FlowError::ValidationFailed { .. }));
}
