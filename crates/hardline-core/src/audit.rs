//! Audit result types - the normalized outcome of evaluating one rule

use crate::rule::Rule;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// Terminal status of a rule evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditStatus {
    Pass,
    Fail,
    Timeout,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Pass => "PASS",
            AuditStatus::Fail => "FAIL",
            AuditStatus::Timeout => "TIMEOUT",
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of auditing one rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    pub status: AuditStatus,
    /// Human-readable description of the current system state
    pub actual: String,
    /// The pattern or value the check expected
    pub expected: String,
}

impl AuditResult {
    /// Build a result for a rule with the given status and actual value
    pub fn for_rule(rule: &Rule, status: AuditStatus, actual: impl Into<String>) -> Self {
        Self {
            id: rule.id.clone(),
            name: rule.name.clone(),
            severity: rule.severity,
            status,
            actual: actual.into(),
            expected: rule.check.expect_pattern.clone(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == AuditStatus::Pass
    }
}
