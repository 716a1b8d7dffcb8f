// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Ready-made pipelines

mod dotnet;

pub use dotnet::{dotnet_pipeline, DotNetPipelineOptions, BUILD_JOB, TAG_JOB};
