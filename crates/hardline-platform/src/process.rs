//! Shared command execution for audit and action modes

use regex::Regex;
use std::process::Command;
use tracing::debug;

/// Outcome of a `run_command` call.
///
/// Audit mode never reports an error: a missing pattern is a failed check.
/// Action mode carries an error string for non-zero exits and spawn
/// failures so remediation can surface it.
#[derive(Debug, Clone, Default)]
pub struct CommandResult {
    /// Predicate result: pattern matched (audit) or exit 0 (action)
    pub passed: bool,
    /// Combined stdout+stderr, trimmed
    pub output: String,
    /// Process exit code, if the process ran and exited normally
    pub exit_code: Option<i32>,
    /// Action-mode failure or spawn failure
    pub error: Option<String>,
}

impl CommandResult {
    fn spawn_failure(message: String) -> Self {
        Self {
            passed: false,
            output: String::new(),
            exit_code: None,
            error: Some(message),
        }
    }
}

/// Execute `cmd` with `args`, selecting the mode by `expect_pattern`.
///
/// Audit mode (pattern non-empty): pass iff the trimmed combined output
/// matches the pattern as a regex or contains it as a substring. A
/// grep-style exit 1 with empty output is normalized to a plain
/// "Pattern Not Found" failure rather than a system error.
///
/// Action mode (pattern empty): pass iff the exit code is zero; non-zero
/// exits carry the captured output in the error.
pub fn run_command(cmd: &str, args: &[String], expect_pattern: &str) -> CommandResult {
    debug!("Executing: {} {}", cmd, args.join(" "));

    let output = match Command::new(cmd).args(args).output() {
        Ok(o) => o,
        Err(e) => {
            return CommandResult::spawn_failure(format!("failed to run {}: {}", cmd, e));
        }
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let out_str = combined.trim().to_string();
    let exit_code = output.status.code();

    // 1. Audit mode (checking for a pattern)
    if !expect_pattern.is_empty() {
        if exit_code == Some(1) && out_str.is_empty() && cmd.contains("grep") {
            return CommandResult {
                passed: false,
                output: String::from("Pattern Not Found"),
                exit_code,
                error: None,
            };
        }

        let matched = Regex::new(expect_pattern)
            .map(|re| re.is_match(&out_str))
            .unwrap_or(false);
        if matched || out_str.contains(expect_pattern) {
            return CommandResult {
                passed: true,
                output: out_str,
                exit_code,
                error: None,
            };
        }

        let output = if out_str.is_empty() {
            String::from("Empty Output")
        } else {
            out_str
        };
        return CommandResult {
            passed: false,
            output,
            exit_code,
            error: None,
        };
    }

    // 2. Action mode (running a fix/command)
    if !output.status.success() {
        return CommandResult {
            passed: false,
            output: out_str.clone(),
            exit_code,
            error: Some(format!(
                "execution failed (exit {:?}) | output: {}",
                exit_code, out_str
            )),
        };
    }

    CommandResult {
        passed: true,
        output: out_str,
        exit_code,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_action_mode_exit_zero_passes() {
        let result = run_command("true", &[], "");
        assert!(result.passed);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_action_mode_nonzero_exit_is_error() {
        let result = run_command("false", &[], "");
        assert!(!result.passed);
        assert!(result.error.is_some());
        assert_eq!(result.exit_code, Some(1));
    }

    #[test]
    fn test_action_mode_spawn_failure() {
        let result = run_command("definitely-not-a-real-binary", &[], "");
        assert!(!result.passed);
        assert!(result.error.is_some());
        assert!(result.exit_code.is_none());
    }

    #[test]
    fn test_audit_mode_substring_match() {
        let result = run_command("echo", &args(&["hello world"]), "world");
        assert!(result.passed);
        assert_eq!(result.output, "hello world");
    }

    #[test]
    fn test_audit_mode_regex_match() {
        let result = run_command("echo", &args(&["value = 42"]), r"value\s*=\s*\d+");
        assert!(result.passed);
    }

    #[test]
    fn test_audit_mode_mismatch_keeps_output() {
        let result = run_command("echo", &args(&["permissive"]), "restricted");
        assert!(!result.passed);
        assert!(result.error.is_none());
        assert_eq!(result.output, "permissive");
    }

    #[test]
    fn test_grep_exit_one_normalized() {
        // grep over /dev/null finds nothing and exits 1
        let result = run_command("grep", &args(&["needle", "/dev/null"]), "needle");
        assert!(!result.passed);
        assert!(result.error.is_none());
        assert_eq!(result.output, "Pattern Not Found");
    }

    #[test]
    fn test_invalid_regex_falls_back_to_substring() {
        let result = run_command("echo", &args(&["a[b"]), "a[b");
        assert!(result.passed);
    }
}
