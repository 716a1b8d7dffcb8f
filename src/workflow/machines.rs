// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Hosted runner images usable as a job's `runs-on`

pub const WINDOWS_2019: &str = "windows-2019";
pub const WINDOWS_2022: &str = "windows-2022";
pub const WINDOWS_LATEST: &str = "windows-latest";
pub const UBUNTU_LATEST: &str = "ubuntu-latest";
pub const MACOS_LATEST: &str = "macos-latest";

/// Whether a run target is a Windows image
pub fn is_windows(runs_on: &str) -> bool {
    runs_on.trim().to_ascii_lowercase().starts_with("windows")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_windows() {
        assert!(is_windows(WINDOWS_2019));
        assert!(is_windows("Windows-Latest"));
        assert!(!is_windows(UBUNTU_LATEST));
        assert!(!is_windows(MACOS_LATEST));
    }
}
