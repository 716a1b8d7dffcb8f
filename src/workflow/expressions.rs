// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Builders for runner expressions
//!
//! Expressions are opaque to flowsmith: these helpers only assemble the
//! text, nothing here parses or evaluates it.

/// Wrap an expression body in `${{ }}`
pub fn wrap(body: &str) -> String {
    format!("${{{{ {} }}}}", body)
}

/// Reference to a step output: `${{ steps.<id>.outputs.<name> }}`
pub fn step_output(step_id: &str, output: &str) -> String {
    wrap(&format!("steps.{}.outputs.{}", step_id, output))
}

/// Reference to a repository secret: `${{ secrets.<name> }}`
pub fn secret(name: &str) -> String {
    wrap(&format!("secrets.{}", name))
}

/// Value for the `IS_RELEASE_CANDIDATE` workflow variable
///
/// True when the run is a pull request into `branch` whose title starts with
/// `RELEASES:` and which carries the `RELEASES` label.
pub fn is_release_candidate(branch: &str) -> String {
    wrap(&format!(
        "github.event_name == 'pull_request' && \
         github.base_ref == '{}' && \
         startsWith(github.event.pull_request.title, 'RELEASES:') && \
         contains(github.event.pull_request.labels.*.name, 'RELEASES')",
        branch
    ))
}

/// Guard for the release tagging job
///
/// One clause per line; lines are always joined with `\n` so the output does
/// not depend on the host platform.
pub fn release_gate(depends_on: &str, branch: &str) -> String {
    [
        format!("needs.{}.result == 'success'", depends_on),
        "github.event.pull_request.merged".to_string(),
        format!("github.event.pull_request.base.ref == '{}'", branch),
        "startsWith(github.event.pull_request.title, 'RELEASES:')".to_string(),
        "contains(github.event.pull_request.labels.*.name, 'RELEASES')".to_string(),
    ]
    .join(" && \n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_output() {
        assert_eq!(
            step_output("extract_version", "version_number"),
            "${{ steps.extract_version.outputs.version_number }}"
        );
    }

    #[test]
    fn test_secret() {
        assert_eq!(secret("PAT_FOR_TAGGING"), "${{ secrets.PAT_FOR_TAGGING }}");
    }

    #[test]
    fn test_release_gate_lines() {
        let gate = release_gate("build", "main");
        let lines: Vec<&str> = gate.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "needs.build.result == 'success' && ");
        assert!(lines[2].contains("base.ref == 'main'"));
        assert!(!gate.contains('\r'));
        assert!(!gate.ends_with("&& "));
    }

    #[test]
    fn test_release_candidate_mentions_branch() {
        let expr = is_release_candidate("master");
        assert!(expr.starts_with("${{ "));
        assert!(expr.ends_with(" }}"));
        assert!(expr.contains("github.base_ref == 'master'"));
    }
}
