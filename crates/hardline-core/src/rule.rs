//! Policy rule model - the declarative compliance document
//!
//! These types map directly onto the JSON policy documents (the annexure
//! files). Parsing is structural only: unknown fields are ignored and
//! missing optional fields default, so the scheduler and executor must
//! tolerate partial data.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// One declarative compliance control: a check plus the actions that
/// remediate and roll back the setting it covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule ID within a policy
    pub id: String,
    /// Rule name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Severity if the check fails
    #[serde(default)]
    pub severity: Severity,
    /// Platform this rule applies to ("linux", "windows")
    #[serde(default)]
    pub platform: String,
    /// Shape of the check
    #[serde(rename = "type", default)]
    pub kind: RuleKind,
    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,
    /// Rule IDs that must complete before this rule runs
    #[serde(default)]
    pub depends_on: Vec<String>,

    #[serde(default)]
    pub check: CheckAction,
    #[serde(default)]
    pub remediation: Action,
    #[serde(default)]
    pub rollback: Action,
}

/// The shape of a rule's check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Command,
    FileCheck,
    FileEdit,
    Registry,
    Secedit,
    #[default]
    Manual,
    /// Unrecognized kind; parses fine, fails at dispatch
    #[serde(other)]
    Other,
}

/// Inputs for the audit step of a rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckAction {
    // Command based checks
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub expect_pattern: String,

    // Registry (Windows only)
    #[serde(default)]
    pub reg_key: String,
    #[serde(default)]
    pub reg_value: String,
    #[serde(default)]
    pub expected: Option<Scalar>,

    // File based checks
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub file_mode: String,
}

/// A remediation or rollback action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type", default)]
    pub kind: ActionKind,

    // Command
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,

    // Registry
    #[serde(default)]
    pub reg_key: String,
    #[serde(default)]
    pub reg_value: String,
    #[serde(default)]
    pub value: Option<Scalar>,

    // File editing (Linux)
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub search_regex: String,
    #[serde(default)]
    pub replace_text: String,
}

/// Kind of a remediation or rollback action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Command,
    Registry,
    FileEdit,
    FileAppend,
    Secedit,
    Manual,
    /// Absent or unrecognized kind; fails at dispatch
    #[default]
    #[serde(other)]
    Other,
}

/// A heterogeneous policy scalar.
///
/// Policy documents carry expected values as either integers or strings;
/// JSON parsing may also deliver integers as floats. The registry adapter
/// normalizes through `as_int` before comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Normalize to an integer, accepting float-origin numbers
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            Scalar::Float(v) => Some(*v as i64),
            Scalar::Str(_) => None,
        }
    }

    /// The string payload, if this scalar is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            // Float-origin integers print without the fraction
            Scalar::Float(v) if v.fract() == 0.0 => write!(f, "{}", *v as i64),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A versioned bundle of rules, immutable once parsed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Policy {
    /// Look up a rule by ID
    pub fn find(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }
}
