// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Physical step schema
//!
//! The single shape every [`Task`](super::Task) variant collapses onto
//! before rendering.

use indexmap::IndexMap;
use serde_yaml::Mapping;

/// A step exactly as the runner sees it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub name: String,
    pub id: String,
    /// Guard expression, rendered as `if`
    pub condition: String,
    /// Action reference (`owner/repo@ref`)
    pub uses: String,
    /// Action inputs, in insertion order
    pub with: Mapping,
    /// Inline command
    pub run: String,
    pub shell: String,
    pub env: IndexMap<String, String>,
    pub continue_on_error: bool,
    pub timeout_minutes: u32,
}

impl Step {
    /// Whether this step invokes a reusable action
    pub fn is_action(&self) -> bool {
        !self.uses.is_empty()
    }

    /// Whether this step runs an inline command
    pub fn is_command(&self) -> bool {
        !self.run.is_empty()
    }
}
