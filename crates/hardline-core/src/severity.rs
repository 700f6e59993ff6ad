//! Severity levels and scan profiles

use serde::{Deserialize, Serialize};

/// Severity level of a compliance rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Low severity, minimal risk
    #[default]
    Low,
    /// Medium severity, moderate risk
    Medium,
    /// High severity, significant risk
    High,
    /// Critical severity, immediate action required
    Critical,
}

impl Severity {
    /// Get numeric value for sorting/comparison
    pub fn as_number(&self) -> u8 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
            Severity::Critical => 3,
        }
    }

    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scan profile restricting which severities a scan evaluates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Critical and High only
    Basic,
    /// Critical, High and Medium
    Moderate,
    /// All rules
    #[default]
    Strict,
}

impl Profile {
    /// Whether a rule of the given severity is evaluated under this profile
    pub fn includes(&self, severity: Severity) -> bool {
        match self {
            Profile::Strict => true,
            Profile::Moderate => severity >= Severity::Medium,
            Profile::Basic => severity >= Severity::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Basic => "basic",
            Profile::Moderate => "moderate",
            Profile::Strict => "strict",
        }
    }

    /// Parse a profile name, falling back to strict for unknown input
    pub fn parse_or_strict(name: &str) -> Self {
        match name {
            "basic" => Profile::Basic,
            "moderate" => Profile::Moderate,
            _ => Profile::Strict,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
