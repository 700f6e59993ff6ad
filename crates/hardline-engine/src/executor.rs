//! Audit executor - runs scheduled layers concurrently under deadlines

use crate::raw_value::resolve_raw_value;
use crate::scheduler;
use hardline_core::{AuditResult, AuditStatus, Policy, Result, Rule, RuleKind, Scalar};
use hardline_platform::{Hardener, SeceditManager};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Deadline applied to every individual rule evaluation
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest `actual` value reported before truncation
const MAX_ACTUAL_LEN: usize = 60;

/// Audit every rule of the policy.
///
/// Layers from the scheduler run strictly in order; the rules inside one
/// layer are evaluated concurrently and the layer barrier completes before
/// the next layer starts. Each rule gets [`CHECK_TIMEOUT`]; rules that
/// exceed it report `TIMEOUT`. Per-rule failures never abort the scan -
/// the only fatal error is an unschedulable (cyclic) policy.
pub async fn run_audit(platform: Arc<dyn Hardener>, policy: &Policy) -> Result<Vec<AuditResult>> {
    run_audit_with_timeout(platform, policy, CHECK_TIMEOUT).await
}

pub(crate) async fn run_audit_with_timeout(
    platform: Arc<dyn Hardener>,
    policy: &Policy,
    deadline: Duration,
) -> Result<Vec<AuditResult>> {
    let layers = scheduler::schedule(&policy.rules)?;
    info!(
        "Auditing {} rules across {} layers",
        policy.rules.len(),
        layers.len()
    );

    let mut results = Vec::with_capacity(policy.rules.len());

    for layer in layers {
        let mut handles = Vec::with_capacity(layer.len());
        for rule in layer {
            let platform = Arc::clone(&platform);
            let task = tokio::spawn(evaluate_with_deadline(platform, rule.clone(), deadline));
            handles.push((rule, task));
        }

        // Layer barrier: every member reaches a terminal result before the
        // next layer starts
        for (rule, task) in handles {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => {
                    error!("Audit task for {} aborted: {}", rule.id, e);
                    AuditResult::for_rule(&rule, AuditStatus::Fail, "Check aborted")
                }
            };
            results.push(result);
        }
    }

    Ok(results)
}

async fn evaluate_with_deadline(
    platform: Arc<dyn Hardener>,
    rule: Rule,
    deadline: Duration,
) -> AuditResult {
    let blocking_rule = rule.clone();
    let blocking_platform = Arc::clone(&platform);
    let job = tokio::task::spawn_blocking(move || {
        evaluate_rule(blocking_platform.as_ref(), &blocking_rule)
    });

    match tokio::time::timeout(deadline, job).await {
        Ok(Ok((status, actual))) => AuditResult::for_rule(&rule, status, actual),
        Ok(Err(e)) => {
            error!("Check for {} aborted: {}", rule.id, e);
            AuditResult::for_rule(&rule, AuditStatus::Fail, "Check aborted")
        }
        Err(_) => AuditResult::for_rule(&rule, AuditStatus::Timeout, "Check timed out"),
    }
}

/// Evaluate one rule synchronously, returning its status and actual value
fn evaluate_rule(platform: &dyn Hardener, rule: &Rule) -> (AuditStatus, String) {
    let (passed, actual, errored) = match rule.kind {
        RuleKind::Command | RuleKind::FileCheck | RuleKind::FileEdit => {
            let outcome =
                platform.run_command(&rule.check.cmd, &rule.check.args, &rule.check.expect_pattern);

            let mut actual = outcome.output.clone();
            // On failure, swap uninformative output for the real system value
            if !outcome.passed {
                let raw = resolve_raw_value(platform, &rule.check.cmd, &rule.check.args);
                if raw != "Missing" && raw != "fail" {
                    actual = raw;
                }
            }

            let mut actual = truncate_actual(actual.trim());
            if outcome.passed && actual.is_empty() {
                actual = String::from("Verified Secure");
            }

            (outcome.passed, actual, outcome.error.is_some())
        }

        RuleKind::Registry => {
            let expected = rule
                .check
                .expected
                .clone()
                .unwrap_or(Scalar::Str(String::new()));
            match platform.check_registry(&rule.check.reg_key, &rule.check.reg_value, &expected) {
                Ok(true) => (true, expected.to_string(), false),
                Ok(false) => (false, String::from("Registry Mismatch"), false),
                Err(_) => (false, String::from("Registry Mismatch"), true),
            }
        }

        RuleKind::Secedit => {
            let expected = rule
                .check
                .expected
                .as_ref()
                .and_then(|s| s.as_str())
                .unwrap_or("");
            match SeceditManager::new().check_user_right(&rule.check.reg_key, expected) {
                Ok(true) => (true, String::from("Right Assigned"), false),
                Ok(false) => (false, String::from("Right Missing"), false),
                Err(_) => (false, String::from("Right Missing"), true),
            }
        }

        // Manual and unrecognized kinds have nothing to evaluate
        RuleKind::Manual | RuleKind::Other => (false, String::new(), false),
    };

    let status = if passed && !errored {
        AuditStatus::Pass
    } else {
        AuditStatus::Fail
    };
    (status, actual)
}

pub(crate) fn truncate_actual(value: &str) -> String {
    if value.chars().count() > MAX_ACTUAL_LEN {
        let head: String = value.chars().take(MAX_ACTUAL_LEN - 3).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}
