// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! # flowsmith - Typed GitHub Actions workflows
//!
//! `flowsmith` builds CI workflows from a typed model and writes them as
//! deterministic YAML.
//!
//! ## Features
//!
//! - **Typed model** - Pipelines, jobs and a closed set of task kinds
//! - **Deterministic output** - Fixed key order, aliases, omitted defaults
//! - **Pre-emit validation** - Unknown `needs`, cycles, duplicate step ids
//! - **Release template** - Tag and publish from a project file's version
//!
//! ## Quick Start
//!
//! ```no_run
//! use flowsmith::workflow::{machines, Job, PushEvent, Task, Triggers};
//! use flowsmith::{emit, Pipeline};
//!
//! # fn main() -> flowsmith::FlowResult<()> {
//! let pipeline = Pipeline::new("ci")?
//!     .with_triggers(Triggers::new().on_push(PushEvent::new().branch("main")))
//!     .with_job(
//!         "build",
//!         Job::new(machines::UBUNTU_LATEST)?.steps([Task::checkout(), Task::build()]),
//!     )?;
//!
//! emit(&pipeline, ".github/workflows/ci.yml")?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod render;
pub mod templates;
pub mod workflow;

// Re-export commonly used types
pub use client::{emit, WorkflowClient};
pub use errors::{FlowError, FlowResult};
pub use workflow::{Job, Pipeline, Task};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
