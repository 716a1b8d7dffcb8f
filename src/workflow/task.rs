// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Task variants
//!
//! A [`Task`] is a typed step: its [`TaskKind`] carries only the parameters
//! that matter for that kind of work, and [`Task::to_step`] turns it into
//! the physical [`Step`] schema. Constructors validate their parameters up
//! front, so a `Task` that exists can always be rendered.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use crate::errors::{required, FlowError, FlowResult};
use crate::render::Render;
use crate::workflow::{machines, Step};

/// Version of `actions/checkout` to invoke
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutVersion {
    #[default]
    V2,
    V3,
    V4,
}

impl CheckoutVersion {
    /// Action reference for this version
    pub fn action(&self) -> &'static str {
        match self {
            Self::V2 => "actions/checkout@v2",
            Self::V3 => "actions/checkout@v3",
            Self::V4 => "actions/checkout@v4",
        }
    }
}

/// Version block passed to the runtime setup action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeVersion {
    pub version: String,
    pub include_prerelease: bool,
}

/// Shell dialect used by the property extraction recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPlatform {
    Bash,
    PowerShell,
}

impl ScriptPlatform {
    /// Pick the dialect that matches a job's run target
    pub fn for_runner(runs_on: &str) -> Self {
        if machines::is_windows(runs_on) {
            Self::PowerShell
        } else {
            Self::Bash
        }
    }

    fn shell(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::PowerShell => "pwsh",
        }
    }
}

/// What a generic step does: call an action or run a command, never both
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    Uses {
        action: String,
        with: IndexMap<String, String>,
    },
    Run {
        command: String,
        shell: String,
    },
}

/// The closed set of task kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    Checkout {
        version: CheckoutVersion,
        with: IndexMap<String, String>,
    },
    SetupRuntime(RuntimeVersion),
    Restore,
    Build,
    Test,
    ShellScript {
        command: String,
        shell: String,
    },
    ConfigureGit {
        user_name: String,
        user_email: String,
    },
    ExtractProperty {
        project_path: String,
        property: String,
        output: String,
        platform: ScriptPlatform,
    },
    CreateTag {
        tag_name: String,
        message: String,
    },
    CreateRelease {
        release_name: String,
        tag_name: String,
        notes: String,
        token: String,
    },
    Generic(StepAction),
}

pub const SETUP_DOTNET_ACTION: &str = "actions/setup-dotnet@v1";
pub const CREATE_RELEASE_ACTION: &str = "actions/create-release@v1";
pub const RELEASE_BOT_NAME: &str = "Add Git Release Tag Action";
pub const RELEASE_BOT_EMAIL: &str = "github.action@noreply.github.com";

/// One step of a job
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub name: String,
    pub id: String,
    pub condition: String,
    pub env: IndexMap<String, String>,
    pub continue_on_error: bool,
    pub timeout_minutes: u32,
    pub kind: TaskKind,
}

impl Task {
    fn from_kind(kind: TaskKind) -> Self {
        Self {
            name: String::new(),
            id: String::new(),
            condition: String::new(),
            env: IndexMap::new(),
            continue_on_error: false,
            timeout_minutes: 0,
            kind,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Constructors
    // ─────────────────────────────────────────────────────────────────────────

    /// Check out the repository with `actions/checkout@v2`
    pub fn checkout() -> Self {
        Self::checkout_version(CheckoutVersion::V2)
    }

    /// Check out the repository with a specific checkout action version
    pub fn checkout_version(version: CheckoutVersion) -> Self {
        Self::from_kind(TaskKind::Checkout {
            version,
            with: IndexMap::new(),
        })
    }

    /// Install a .NET SDK
    pub fn setup_dotnet(version: &str, include_prerelease: bool) -> FlowResult<Self> {
        let version = required("runtime setup task", "version", version)?;
        Ok(Self::from_kind(TaskKind::SetupRuntime(RuntimeVersion {
            version,
            include_prerelease,
        })))
    }

    /// `dotnet restore`
    pub fn restore() -> Self {
        Self::from_kind(TaskKind::Restore)
    }

    /// `dotnet build --no-restore`
    pub fn build() -> Self {
        Self::from_kind(TaskKind::Build)
    }

    /// `dotnet test --no-build --verbosity normal`
    pub fn test() -> Self {
        Self::from_kind(TaskKind::Test)
    }

    /// Run a shell script with the runner's default shell
    pub fn shell(command: &str) -> FlowResult<Self> {
        let command = required("shell script task", "command", command)?;
        Ok(Self::from_kind(TaskKind::ShellScript {
            command,
            shell: String::new(),
        }))
    }

    /// Set the git identity used by the release bot
    pub fn configure_git() -> Self {
        Self::from_kind(TaskKind::ConfigureGit {
            user_name: RELEASE_BOT_NAME.to_string(),
            user_email: RELEASE_BOT_EMAIL.to_string(),
        })
    }

    /// Set a custom git identity
    pub fn configure_git_as(user_name: &str, user_email: &str) -> FlowResult<Self> {
        let context = "git configuration task";
        Ok(Self::from_kind(TaskKind::ConfigureGit {
            user_name: required(context, "user_name", user_name)?,
            user_email: required(context, "user_email", user_email)?,
        }))
    }

    /// Read an XML property from a project file into a step output
    ///
    /// The step id is mandatory since later steps reach the value through
    /// `steps.<id>.outputs.<output>`.
    pub fn extract_property(
        id: &str,
        project_path: &str,
        property: &str,
        output: &str,
        runs_on: &str,
    ) -> FlowResult<Self> {
        let context = "property extraction task";
        let id = required(context, "id", id)?;
        let project_path = required(context, "project_path", project_path)?;
        let property = required(context, "property", property)?;
        let output = required(context, "output", output)?;
        let runs_on = required(context, "runs_on", runs_on)?;

        if !is_identifier(&property) {
            return Err(FlowError::invalid(
                context,
                format!("'{}' is not a valid XML element name", property),
                None,
            ));
        }
        if !is_identifier(&output) {
            return Err(FlowError::invalid(
                context,
                format!("'{}' is not a valid output name", output),
                Some("Use letters, digits, '_' or '-'".into()),
            ));
        }

        let mut task = Self::from_kind(TaskKind::ExtractProperty {
            project_path,
            property,
            output,
            platform: ScriptPlatform::for_runner(&runs_on),
        });
        task.id = id;
        Ok(task)
    }

    /// Create an annotated git tag and push it
    pub fn create_tag(tag_name: &str, message: &str) -> FlowResult<Self> {
        let context = "tag creation task";
        let tag_name = required(context, "tag_name", tag_name)?;
        let message = required(context, "message", message)?;

        for (parameter, value) in [("tag_name", &tag_name), ("message", &message)] {
            if value.contains('"') {
                return Err(FlowError::invalid(
                    context,
                    format!("{} must not contain double quotes", parameter),
                    Some("The value is placed verbatim inside a quoted shell argument".into()),
                ));
            }
        }

        Ok(Self::from_kind(TaskKind::CreateTag { tag_name, message }))
    }

    /// Publish a release for an existing tag
    pub fn create_release(
        release_name: &str,
        tag_name: &str,
        notes: &str,
        token: &str,
    ) -> FlowResult<Self> {
        let context = "release creation task";
        Ok(Self::from_kind(TaskKind::CreateRelease {
            release_name: required(context, "release_name", release_name)?,
            tag_name: required(context, "tag_name", tag_name)?,
            notes: notes.to_string(),
            token: required(context, "token", token)?,
        }))
    }

    /// Invoke an arbitrary action
    pub fn uses(action: &str) -> FlowResult<Self> {
        let action = required("action step", "uses", action)?;
        Ok(Self::from_kind(TaskKind::Generic(StepAction::Uses {
            action,
            with: IndexMap::new(),
        })))
    }

    /// Run an arbitrary inline command
    pub fn run(command: &str) -> FlowResult<Self> {
        let command = required("command step", "run", command)?;
        Ok(Self::from_kind(TaskKind::Generic(StepAction::Run {
            command,
            shell: String::new(),
        })))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Common fields
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the display name
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the step id
    pub fn with_id(mut self, id: &str) -> FlowResult<Self> {
        self.id = required(self.context(), "id", id)?;
        Ok(self)
    }

    /// Guard the step with an `if` expression
    pub fn when(mut self, condition: &str) -> FlowResult<Self> {
        self.condition = required(self.context(), "condition", condition)?;
        Ok(self)
    }

    /// Add or replace an environment variable
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Let the job continue when this step fails
    pub fn continue_on_error(mut self) -> Self {
        self.continue_on_error = true;
        self
    }

    /// Limit the step's run time
    pub fn timeout(mut self, minutes: u32) -> Self {
        self.timeout_minutes = minutes;
        self
    }

    /// Add an action input
    ///
    /// Only tasks that invoke an action accept inputs; inline command tasks
    /// reject them so a step never carries both `uses` and `run` semantics.
    pub fn with_input(mut self, key: &str, value: &str) -> FlowResult<Self> {
        let context = self.context();
        let key = required(context, "input name", key)?;
        match &mut self.kind {
            TaskKind::Checkout { with, .. }
            | TaskKind::Generic(StepAction::Uses { with, .. }) => {
                with.insert(key, value.to_string());
                Ok(self)
            }
            _ => Err(FlowError::invalid(
                context,
                format!("cannot add input '{}'", key),
                Some("Inputs (`with`) only apply to steps that invoke an action".into()),
            )),
        }
    }

    /// Choose the shell for an inline command
    pub fn with_shell(mut self, shell: &str) -> FlowResult<Self> {
        let context = self.context();
        let shell = required(context, "shell", shell)?;
        match &mut self.kind {
            TaskKind::ShellScript { shell: current, .. }
            | TaskKind::Generic(StepAction::Run { shell: current, .. }) => {
                *current = shell;
                Ok(self)
            }
            _ => Err(FlowError::invalid(
                context,
                "a shell only applies to inline commands",
                None,
            )),
        }
    }

    /// Variant name, used in diagnostics
    pub fn variant(&self) -> &'static str {
        match &self.kind {
            TaskKind::Checkout { .. } => "checkout",
            TaskKind::SetupRuntime(_) => "setup-runtime",
            TaskKind::Restore => "restore",
            TaskKind::Build => "build",
            TaskKind::Test => "test",
            TaskKind::ShellScript { .. } => "shell-script",
            TaskKind::ConfigureGit { .. } => "configure-git",
            TaskKind::ExtractProperty { .. } => "extract-property",
            TaskKind::CreateTag { .. } => "create-tag",
            TaskKind::CreateRelease { .. } => "create-release",
            TaskKind::Generic(StepAction::Uses { .. }) => "action",
            TaskKind::Generic(StepAction::Run { .. }) => "command",
        }
    }

    fn context(&self) -> &'static str {
        match &self.kind {
            TaskKind::Checkout { .. } => "checkout task",
            TaskKind::SetupRuntime(_) => "runtime setup task",
            TaskKind::Restore => "restore task",
            TaskKind::Build => "build task",
            TaskKind::Test => "test task",
            TaskKind::ShellScript { .. } => "shell script task",
            TaskKind::ConfigureGit { .. } => "git configuration task",
            TaskKind::ExtractProperty { .. } => "property extraction task",
            TaskKind::CreateTag { .. } => "tag creation task",
            TaskKind::CreateRelease { .. } => "release creation task",
            TaskKind::Generic(StepAction::Uses { .. }) => "action step",
            TaskKind::Generic(StepAction::Run { .. }) => "command step",
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Collapse this task onto the physical step schema
    pub fn to_step(&self) -> Step {
        let mut step = Step {
            name: self.name.clone(),
            id: self.id.clone(),
            condition: self.condition.clone(),
            continue_on_error: self.continue_on_error,
            timeout_minutes: self.timeout_minutes,
            ..Step::default()
        };

        match &self.kind {
            TaskKind::Checkout { version, with } => {
                step.uses = version.action().to_string();
                step.with = inputs(with);
            }
            TaskKind::SetupRuntime(version) => {
                step.uses = SETUP_DOTNET_ACTION.to_string();
                if let Value::Mapping(block) = version.render() {
                    step.with = block;
                }
            }
            TaskKind::Restore => step.run = "dotnet restore".into(),
            TaskKind::Build => step.run = "dotnet build --no-restore".into(),
            TaskKind::Test => step.run = "dotnet test --no-build --verbosity normal".into(),
            TaskKind::ShellScript { command, shell }
            | TaskKind::Generic(StepAction::Run { command, shell }) => {
                step.run = command.clone();
                step.shell = shell.clone();
            }
            TaskKind::ConfigureGit {
                user_name,
                user_email,
            } => {
                step.run = format!(
                    "git config user.name \"{}\"\ngit config user.email \"{}\"",
                    user_name, user_email
                );
            }
            TaskKind::ExtractProperty {
                project_path,
                property,
                output,
                platform,
            } => {
                step.run = extraction_script(*platform, project_path, property, output);
                step.shell = platform.shell().to_string();
            }
            TaskKind::CreateTag { tag_name, message } => {
                step.run = format!(
                    "git tag -a \"{}\" -m \"{}\"\ngit push origin --tags",
                    tag_name, message
                );
            }
            TaskKind::CreateRelease {
                release_name,
                tag_name,
                notes,
                token,
            } => {
                step.uses = CREATE_RELEASE_ACTION.to_string();
                step.env.insert("GITHUB_TOKEN".into(), token.clone());

                let mut with = Mapping::new();
                with.insert("tag_name".into(), tag_name.as_str().into());
                with.insert("release_name".into(), release_name.as_str().into());
                if !notes.is_empty() {
                    with.insert("body".into(), notes.as_str().into());
                }
                with.insert("draft".into(), Value::Bool(false));
                with.insert("prerelease".into(), Value::Bool(false));
                step.with = with;
            }
            TaskKind::Generic(StepAction::Uses { action, with }) => {
                step.uses = action.clone();
                step.with = inputs(with);
            }
        }

        for (key, value) in &self.env {
            step.env.insert(key.clone(), value.clone());
        }

        step
    }
}

fn inputs(with: &IndexMap<String, String>) -> Mapping {
    with.iter()
        .map(|(k, v)| (Value::from(k.as_str()), Value::from(v.as_str())))
        .collect()
}

fn is_identifier(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Script publishing `<property>` of a project file as step output `output`
///
/// Uses the multi-line `GITHUB_OUTPUT` form so values such as release notes
/// survive intact.
fn extraction_script(
    platform: ScriptPlatform,
    project_path: &str,
    property: &str,
    output: &str,
) -> String {
    let lines = match platform {
        ScriptPlatform::Bash => vec![
            format!(
                "{output}=$(grep -oPz '(?<=<{property}>)[^<]*' \"{project_path}\" | tr -d '\\0')"
            ),
            "{".to_string(),
            format!("  echo \"{output}<<EOF\""),
            format!("  echo \"${{{output}}}\""),
            "  echo \"EOF\"".to_string(),
            "} >> \"$GITHUB_OUTPUT\"".to_string(),
        ],
        ScriptPlatform::PowerShell => vec![
            format!("$project = [xml](Get-Content -Raw -Path \"{project_path}\")"),
            format!(
                "$value = $project.Project.PropertyGroup | ForEach-Object {{ $_.{property} }} | Where-Object {{ $_ }} | Select-Object -First 1"
            ),
            format!("Add-Content -Path $env:GITHUB_OUTPUT -Value \"{output}<<EOF\""),
            "Add-Content -Path $env:GITHUB_OUTPUT -Value $value".to_string(),
            "Add-Content -Path $env:GITHUB_OUTPUT -Value \"EOF\"".to_string(),
        ],
    };

    lines.join("\n")
}
