//! Remediation and rollback - applying fixes and undoing them

use crate::executor::truncate_actual;
use crate::raw_value::resolve_raw_value;
use hardline_core::{Action, ActionKind, Error, Policy, Result, Rule};
use hardline_platform::{Hardener, SeceditManager};
use hardline_state::Journal;
use tracing::{info, warn};

/// Apply a rule's remediation action.
///
/// The current raw system value is captured and journaled together with a
/// human-readable label of the new value *before* the adapter call runs,
/// so the rule can be reverted and reported on even if this process dies
/// mid-fix. A journal write failure is logged and the fix proceeds.
pub fn apply_fix(platform: &dyn Hardener, journal: &Journal, rule: &Rule) -> Result<()> {
    info!("Applying fix for rule {}", rule.id);

    let prev_value = truncate_actual(&resolve_raw_value(
        platform,
        &rule.check.cmd,
        &rule.check.args,
    ));
    let new_value = derive_new_value(&rule.remediation);

    if let Err(e) = journal.log_action(&rule.id, &rule.name, &prev_value, &new_value) {
        warn!("Journal write failed for {}: {}", rule.id, e);
    }

    dispatch_action(platform, &rule.remediation)
}

/// Apply a rule's rollback action. No journaling: the journal records what
/// fixes changed, and a rollback restores the state it recorded.
pub fn revert_fix(platform: &dyn Hardener, rule: &Rule) -> Result<()> {
    info!("Reverting rule {}", rule.id);
    dispatch_action(platform, &rule.rollback)
}

/// Counts from a full-policy rollback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevertSummary {
    pub reverted: usize,
    pub failed: usize,
}

impl RevertSummary {
    pub fn total(&self) -> usize {
        self.reverted + self.failed
    }
}

impl std::fmt::Display for RevertSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Reset complete. Reverted {} rules. Errors: {}",
            self.reverted, self.failed
        )
    }
}

/// Revert every rule of the policy in input order.
///
/// Never aborts mid-loop: failures are counted and reported, and the
/// remaining rules still get their rollback attempt.
pub fn revert_all(platform: &dyn Hardener, policy: &Policy) -> RevertSummary {
    info!("Starting full rollback of {} rules", policy.rules.len());

    let mut summary = RevertSummary::default();
    for rule in &policy.rules {
        match revert_fix(platform, rule) {
            Ok(()) => summary.reverted += 1,
            Err(e) => {
                warn!("Revert issue on {}: {}", rule.id, e);
                summary.failed += 1;
            }
        }
    }
    summary
}

/// Derive the human-readable label of what a remediation sets.
///
/// Purely descriptive - the adapter call is what actually changes the
/// system. The label lands in the journal's `new_value` column.
fn derive_new_value(action: &Action) -> String {
    let replacement = action.replace_text.trim();
    if !replacement.is_empty() {
        return replacement.to_string();
    }

    if action.args.is_empty() {
        return String::from("Applied Fix");
    }

    let full = action.args.join(" ");
    if full.contains('=') && !full.contains("==") {
        // sysctl-style key=value assignment
        full.split_whitespace()
            .find(|token| token.contains('=') && !token.starts_with('-'))
            .map(str::to_string)
            .unwrap_or_else(|| String::from("Applied Fix"))
    } else if full.contains("chmod") {
        full.split_whitespace()
            .find(|token| token.parse::<i64>().is_ok())
            .map(|mode| format!("Mode: {}", mode))
            .unwrap_or_else(|| String::from("Applied Fix"))
    } else if full.contains("modprobe") && full.contains("/bin/true") {
        String::from("Module Blacklisted")
    } else if let Some(inner) = full.strip_prefix("bash -c ") {
        inner.to_string()
    } else {
        full
    }
}

/// Run one remediation or rollback action through the platform adapter
fn dispatch_action(platform: &dyn Hardener, action: &Action) -> Result<()> {
    match action.kind {
        ActionKind::Registry => {
            let value = action
                .value
                .as_ref()
                .ok_or_else(|| Error::Adapter(String::from("registry action missing value")))?;
            platform.set_registry(&action.reg_key, &action.reg_value, value)
        }

        ActionKind::Command => {
            let outcome = platform.run_command(&action.cmd, &action.args, "");
            match outcome.error {
                Some(e) => Err(Error::Adapter(e)),
                None => Ok(()),
            }
        }

        ActionKind::FileEdit | ActionKind::FileAppend => {
            platform.edit_config_file(&action.file_path, &action.search_regex, &action.replace_text)
        }

        ActionKind::Secedit => {
            let users = action
                .value
                .as_ref()
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            SeceditManager::new().set_user_right(&action.reg_key, users)
        }

        ActionKind::Manual => {
            if !action.cmd.is_empty() && action.cmd != "echo" {
                let outcome = platform.run_command(&action.cmd, &action.args, "");
                match outcome.error {
                    Some(e) => Err(Error::Adapter(e)),
                    None => Ok(()),
                }
            } else {
                Err(Error::ManualActionRequired)
            }
        }

        ActionKind::Other => Err(Error::UnknownActionType),
    }
}
