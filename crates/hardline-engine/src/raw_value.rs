//! Raw value resolver - turns opaque check failures into the actual system state
//!
//! Audit checks are usually `cmd | grep expected` pipelines whose failure
//! output says nothing about the offending value. The resolver re-runs just
//! the data-gathering head of the pipeline and maps the common empty-output
//! cases to readable sentinels.

use hardline_platform::Hardener;

/// Execute the head of a rule's check command and describe its output.
pub fn resolve_raw_value(platform: &dyn Hardener, cmd: &str, args: &[String]) -> String {
    // Strip pipe tails so the raw data gatherer runs without its filter
    let mut real_cmd = cmd.to_string();
    let mut real_args: Vec<String> = args.to_vec();

    if let Some((head, _)) = cmd.split_once('|') {
        real_cmd = head.trim().to_string();
    }

    // `bash -c <inner>` wrappers carry the pipeline in their argument
    if real_args.len() > 1 && real_args[0] == "-c" {
        let inner = real_args[1].clone();
        if let Some((head, _)) = inner.split_once('|') {
            real_cmd = String::from("bash");
            real_args = vec![String::from("-c"), head.trim().to_string()];
        }
    }

    let outcome = platform.run_command(&real_cmd, &real_args, "");
    let output = outcome.output.trim().to_string();

    if !outcome.passed || outcome.error.is_some() {
        // A grep/find that produced nothing means the setting is absent
        if (cmd.contains("grep") || cmd.contains("find")) && output.is_empty() {
            return String::from("Not Configured");
        }
        // A failing sysctl means the key does not exist in this kernel
        if cmd.contains("sysctl") && output.is_empty() {
            return String::from("Key Missing in Kernel");
        }
        // Exit 1 with no output: data not found, not a broken command
        if outcome.exit_code == Some(1) && output.is_empty() {
            return String::from("Not Set");
        }
    }

    if output.is_empty() {
        return String::from("Empty / Not Set");
    }

    if output.to_lowercase().contains("fail") {
        return String::from("Vulnerable Config");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubHardener;
    use hardline_platform::CommandResult;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pipeline_tail_is_stripped() {
        let stub = StubHardener::with_command(|_, _, _| CommandResult {
            passed: true,
            output: String::from("2"),
            exit_code: Some(0),
            error: None,
        });

        let value = resolve_raw_value(&stub, "sysctl -n kernel.randomize_va_space | grep 2", &[]);
        assert_eq!(value, "2");

        let calls = stub.calls.lock().unwrap();
        assert_eq!(calls[0].cmd, "sysctl -n kernel.randomize_va_space");
        assert_eq!(calls[0].expect_pattern, "");
    }

    #[test]
    fn test_bash_wrapper_keeps_pipeline_head() {
        let stub = StubHardener::with_command(|_, _, _| CommandResult {
            passed: true,
            output: String::from("PermitRootLogin yes"),
            exit_code: Some(0),
            error: None,
        });

        let value = resolve_raw_value(
            &stub,
            "bash",
            &args(&["-c", "grep PermitRootLogin /etc/ssh/sshd_config | awk '{print $2}'"]),
        );
        assert_eq!(value, "PermitRootLogin yes");

        let calls = stub.calls.lock().unwrap();
        assert_eq!(calls[0].cmd, "bash");
        assert_eq!(
            calls[0].args,
            args(&["-c", "grep PermitRootLogin /etc/ssh/sshd_config"])
        );
    }

    #[test]
    fn test_empty_grep_means_not_configured() {
        let stub = StubHardener::with_command(|_, _, _| CommandResult {
            passed: false,
            output: String::new(),
            exit_code: Some(1),
            error: None,
        });

        let value = resolve_raw_value(&stub, "grep -R blacklist /etc/modprobe.d", &[]);
        assert_eq!(value, "Not Configured");
    }

    #[test]
    fn test_empty_sysctl_means_missing_key() {
        let stub = StubHardener::with_command(|_, _, _| CommandResult {
            passed: false,
            output: String::new(),
            exit_code: Some(255),
            error: Some(String::from("execution failed")),
        });

        let value = resolve_raw_value(&stub, "sysctl -n net.made.up", &[]);
        assert_eq!(value, "Key Missing in Kernel");
    }

    #[test]
    fn test_exit_one_with_empty_output_means_not_set() {
        let stub = StubHardener::with_command(|_, _, _| CommandResult {
            passed: false,
            output: String::new(),
            exit_code: Some(1),
            error: Some(String::from("execution failed")),
        });

        let value = resolve_raw_value(&stub, "testcmd", &[]);
        assert_eq!(value, "Not Set");
    }

    #[test]
    fn test_empty_success_means_empty_not_set() {
        let stub = StubHardener::with_command(|_, _, _| CommandResult {
            passed: true,
            output: String::new(),
            exit_code: Some(0),
            error: None,
        });

        let value = resolve_raw_value(&stub, "cat /etc/motd", &[]);
        assert_eq!(value, "Empty / Not Set");
    }

    #[test]
    fn test_fail_output_means_vulnerable_config() {
        let stub = StubHardener::with_command(|_, _, _| CommandResult {
            passed: true,
            output: String::from("check FAILED"),
            exit_code: Some(0),
            error: None,
        });

        let value = resolve_raw_value(&stub, "auditctl -l", &[]);
        assert_eq!(value, "Vulnerable Config");
    }

    #[test]
    fn test_real_output_passes_through_trimmed() {
        let stub = StubHardener::with_command(|_, _, _| CommandResult {
            passed: true,
            output: String::from("  net.ipv4.ip_forward = 1  "),
            exit_code: Some(0),
            error: None,
        });

        let value = resolve_raw_value(&stub, "sysctl net.ipv4.ip_forward", &[]);
        assert_eq!(value, "net.ipv4.ip_forward = 1");
    }
}
