// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Workflow model
//!
//! Typed description of a GitHub Actions workflow: a [`Pipeline`] holds
//! triggers, variables and an ordered set of [`Job`]s, each job an ordered
//! list of [`Task`]s.

pub mod expressions;
mod graph;
mod job;
pub mod machines;
mod pipeline;
mod step;
mod task;
mod validation;

pub use graph::JobGraph;
pub use job::*;
pub use pipeline::*;
pub use step::Step;
pub use task::*;
pub use validation::{PipelineValidator, ValidationResult};
