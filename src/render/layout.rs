// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Field tables for every rendered model type
//!
//! `order` decides key position, `key` is the exact text written to the
//! workflow file. Table rows are listed in reading order here but the engine
//! only trusts `order`.

use serde_yaml::Value;

use super::{nested, string_map, strings, text, Field, Presence, Render};
use crate::workflow::{
    Job, JobDefaults, Pipeline, PullRequestEvent, PushEvent, RunDefaults, RuntimeVersion, Step,
    Strategy, Triggers,
};

static PIPELINE_FIELDS: [Field<Pipeline>; 4] = [
    Field {
        order: 0,
        key: "name",
        presence: Presence::OmitDefault,
        value: |p| text(&p.name),
    },
    Field {
        order: 1,
        key: "on",
        presence: Presence::OmitDefault,
        value: |p| p.on.render(),
    },
    Field {
        order: 2,
        key: "env",
        presence: Presence::OmitDefault,
        value: |p| string_map(&p.env),
    },
    Field {
        order: 3,
        key: "jobs",
        presence: Presence::Always,
        value: |p| {
            Value::Mapping(
                p.jobs
                    .iter()
                    .map(|(key, job)| (text(key), job.render()))
                    .collect(),
            )
        },
    },
];

impl Render for Pipeline {
    const KIND: &'static str = "pipeline";

    fn fields() -> &'static [Field<Self>] {
        &PIPELINE_FIELDS
    }
}

static TRIGGER_FIELDS: [Field<Triggers>; 2] = [
    Field {
        order: 0,
        key: "push",
        presence: Presence::OmitNone,
        value: |t| nested(&t.push),
    },
    Field {
        order: 1,
        key: "pull_request",
        presence: Presence::OmitNone,
        value: |t| nested(&t.pull_request),
    },
];

impl Render for Triggers {
    const KIND: &'static str = "triggers";

    fn fields() -> &'static [Field<Self>] {
        &TRIGGER_FIELDS
    }
}

static PUSH_FIELDS: [Field<PushEvent>; 3] = [
    Field {
        order: 0,
        key: "branches",
        presence: Presence::OmitDefault,
        value: |e| strings(&e.branches),
    },
    Field {
        order: 1,
        key: "tags",
        presence: Presence::OmitDefault,
        value: |e| strings(&e.tags),
    },
    Field {
        order: 2,
        key: "paths",
        presence: Presence::OmitDefault,
        value: |e| strings(&e.paths),
    },
];

impl Render for PushEvent {
    const KIND: &'static str = "push trigger";

    fn fields() -> &'static [Field<Self>] {
        &PUSH_FIELDS
    }
}

static PULL_REQUEST_FIELDS: [Field<PullRequestEvent>; 3] = [
    Field {
        order: 0,
        key: "branches",
        presence: Presence::OmitDefault,
        value: |e| strings(&e.branches),
    },
    Field {
        order: 1,
        key: "types",
        presence: Presence::OmitDefault,
        value: |e| strings(&e.types),
    },
    Field {
        order: 2,
        key: "paths",
        presence: Presence::OmitDefault,
        value: |e| strings(&e.paths),
    },
];

impl Render for PullRequestEvent {
    const KIND: &'static str = "pull request trigger";

    fn fields() -> &'static [Field<Self>] {
        &PULL_REQUEST_FIELDS
    }
}

static JOB_FIELDS: [Field<Job>; 11] = [
    Field {
        order: 0,
        key: "name",
        presence: Presence::OmitDefault,
        value: |j| text(&j.name),
    },
    Field {
        order: 1,
        key: "runs-on",
        presence: Presence::Always,
        value: |j| text(&j.runs_on),
    },
    Field {
        order: 2,
        key: "needs",
        presence: Presence::OmitDefault,
        value: |j| strings(&j.needs),
    },
    Field {
        order: 3,
        key: "if",
        presence: Presence::OmitDefault,
        value: |j| text(&j.condition),
    },
    Field {
        order: 4,
        key: "environment",
        presence: Presence::OmitDefault,
        value: |j| text(&j.environment),
    },
    Field {
        order: 5,
        key: "defaults",
        presence: Presence::OmitDefault,
        value: |j| nested(&j.defaults),
    },
    Field {
        order: 6,
        key: "steps",
        presence: Presence::Always,
        value: |j| Value::Sequence(j.steps.iter().map(|t| t.to_step().render()).collect()),
    },
    Field {
        order: 7,
        key: "timeout-minutes",
        presence: Presence::OmitDefault,
        value: |j| Value::from(j.timeout_minutes),
    },
    Field {
        order: 8,
        key: "strategy",
        presence: Presence::OmitDefault,
        value: |j| nested(&j.strategy),
    },
    Field {
        order: 9,
        key: "env",
        presence: Presence::OmitDefault,
        value: |j| string_map(&j.env),
    },
    Field {
        order: 10,
        key: "outputs",
        presence: Presence::OmitDefault,
        value: |j| string_map(&j.outputs),
    },
];

impl Render for Job {
    const KIND: &'static str = "job";

    fn fields() -> &'static [Field<Self>] {
        &JOB_FIELDS
    }
}

static JOB_DEFAULTS_FIELDS: [Field<JobDefaults>; 1] = [Field {
    order: 0,
    key: "run",
    presence: Presence::OmitDefault,
    value: |d| nested(&d.run),
}];

impl Render for JobDefaults {
    const KIND: &'static str = "job defaults";

    fn fields() -> &'static [Field<Self>] {
        &JOB_DEFAULTS_FIELDS
    }
}

static RUN_DEFAULTS_FIELDS: [Field<RunDefaults>; 2] = [
    Field {
        order: 0,
        key: "shell",
        presence: Presence::OmitDefault,
        value: |r| text(&r.shell),
    },
    Field {
        order: 1,
        key: "working-directory",
        presence: Presence::OmitDefault,
        value: |r| text(&r.working_directory),
    },
];

impl Render for RunDefaults {
    const KIND: &'static str = "run defaults";

    fn fields() -> &'static [Field<Self>] {
        &RUN_DEFAULTS_FIELDS
    }
}

static STRATEGY_FIELDS: [Field<Strategy>; 3] = [
    Field {
        order: 0,
        key: "matrix",
        presence: Presence::OmitDefault,
        value: |s| {
            Value::Mapping(
                s.matrix
                    .iter()
                    .map(|(axis, values)| (text(axis), strings(values)))
                    .collect(),
            )
        },
    },
    Field {
        order: 1,
        key: "fail-fast",
        presence: Presence::OmitNone,
        value: |s| s.fail_fast.map_or(Value::Null, Value::Bool),
    },
    Field {
        order: 2,
        key: "max-parallel",
        presence: Presence::OmitDefault,
        value: |s| Value::from(s.max_parallel),
    },
];

impl Render for Strategy {
    const KIND: &'static str = "strategy";

    fn fields() -> &'static [Field<Self>] {
        &STRATEGY_FIELDS
    }
}

static STEP_FIELDS: [Field<Step>; 10] = [
    Field {
        order: 0,
        key: "name",
        presence: Presence::OmitDefault,
        value: |s| text(&s.name),
    },
    Field {
        order: 1,
        key: "id",
        presence: Presence::OmitDefault,
        value: |s| text(&s.id),
    },
    Field {
        order: 2,
        key: "if",
        presence: Presence::OmitDefault,
        value: |s| text(&s.condition),
    },
    Field {
        order: 3,
        key: "uses",
        presence: Presence::OmitDefault,
        value: |s| text(&s.uses),
    },
    Field {
        order: 4,
        key: "with",
        presence: Presence::OmitDefault,
        value: |s| Value::Mapping(s.with.clone()),
    },
    Field {
        order: 5,
        key: "run",
        presence: Presence::OmitDefault,
        value: |s| text(&s.run),
    },
    Field {
        order: 6,
        key: "shell",
        presence: Presence::OmitDefault,
        value: |s| text(&s.shell),
    },
    Field {
        order: 7,
        key: "env",
        presence: Presence::OmitDefault,
        value: |s| string_map(&s.env),
    },
    Field {
        order: 8,
        key: "continue-on-error",
        presence: Presence::OmitDefault,
        value: |s| Value::Bool(s.continue_on_error),
    },
    Field {
        order: 9,
        key: "timeout-minutes",
        presence: Presence::OmitDefault,
        value: |s| Value::from(s.timeout_minutes),
    },
];

impl Render for Step {
    const KIND: &'static str = "step";

    fn fields() -> &'static [Field<Self>] {
        &STEP_FIELDS
    }
}

static RUNTIME_VERSION_FIELDS: [Field<RuntimeVersion>; 2] = [
    Field {
        order: 0,
        key: "dotnet-version",
        presence: Presence::Always,
        value: |v| text(&v.version),
    },
    Field {
        order: 1,
        key: "include-prerelease",
        presence: Presence::OmitDefault,
        value: |v| Value::Bool(v.include_prerelease),
    },
];

impl Render for RuntimeVersion {
    const KIND: &'static str = "runtime version";

    fn fields() -> &'static [Field<Self>] {
        &RUNTIME_VERSION_FIELDS
    }
}
