// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Generator configuration
//!
//! Loaded from `flowsmith.toml`:
//!
//! ```toml
//! output = ".github/workflows/dotnet.yml"
//!
//! [pipeline]
//! name = ".Net"
//! branch = "master"
//! project_path = "MyApp/MyApp.csproj"
//! tag_job = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{FlowError, FlowResult};
use crate::templates::DotNetPipelineOptions;

/// Default configuration file name
pub const CONFIG_FILE: &str = "flowsmith.toml";

/// Default workflow destination
pub const DEFAULT_OUTPUT: &str = ".github/workflows/dotnet.yml";

/// Contents of `flowsmith.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Where the workflow is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Pipeline template parameters
    #[serde(default)]
    pub pipeline: DotNetPipelineOptions,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            pipeline: DotNetPipelineOptions::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> FlowResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| FlowError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> FlowResult<Self> {
        toml::from_str(content).map_err(Into::into)
    }

    /// Serialize configuration back to TOML
    pub fn to_toml(&self) -> FlowResult<String> {
        toml::to_string_pretty(self).map_err(|e| FlowError::Toml {
            message: e.to_string(),
        })
    }
}
