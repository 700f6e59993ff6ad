//! Severity-profile filtering

use hardline_core::{Policy, Profile};

/// Narrow a policy to the rules the given profile evaluates.
///
/// Pure function: the input policy is untouched, the derived policy carries
/// the surviving rules in their original order.
pub fn filter_policy(policy: &Policy, profile: Profile) -> Policy {
    Policy {
        version: policy.version.clone(),
        rules: policy
            .rules
            .iter()
            .filter(|r| profile.includes(r.severity))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardline_core::{Rule, Severity};

    fn rule(id: &str, severity: Severity) -> Rule {
        Rule {
            id: id.into(),
            severity,
            ..serde_json::from_str("{\"id\": \"\"}").unwrap()
        }
    }

    fn sample_policy() -> Policy {
        Policy {
            version: "1.0".into(),
            rules: vec![
                rule("c", Severity::Critical),
                rule("h", Severity::High),
                rule("m", Severity::Medium),
                rule("l", Severity::Low),
            ],
        }
    }

    fn ids(policy: &Policy) -> Vec<&str> {
        policy.rules.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_basic_keeps_critical_and_high() {
        let filtered = filter_policy(&sample_policy(), Profile::Basic);
        assert_eq!(ids(&filtered), vec!["c", "h"]);
    }

    #[test]
    fn test_moderate_adds_medium() {
        let filtered = filter_policy(&sample_policy(), Profile::Moderate);
        assert_eq!(ids(&filtered), vec!["c", "h", "m"]);
    }

    #[test]
    fn test_strict_keeps_everything() {
        let filtered = filter_policy(&sample_policy(), Profile::Strict);
        assert_eq!(ids(&filtered), vec!["c", "h", "m", "l"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = filter_policy(&sample_policy(), Profile::Moderate);
        let twice = filter_policy(&once, Profile::Moderate);
        assert_eq!(ids(&once), ids(&twice));
    }
}
