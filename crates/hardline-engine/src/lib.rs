//! Hardline Engine - the compliance rule engine
//!
//! Orchestrates the whole lifecycle of a policy: scheduling rules into
//! dependency layers, auditing them concurrently under deadlines, applying
//! remediations with a journaled before/after pair, and rolling fixes back
//! individually or wholesale.
//!
//! # Example
//!
//! ```no_run
//! use hardline_engine::Engine;
//! use hardline_core::Profile;
//!
//! # async fn demo() -> hardline_core::Result<()> {
//! let engine = Engine::with_defaults()?;
//! let policy = hardline_policy::load_policy("policies/annexure_b.json")?;
//!
//! let results = engine.scan(&policy, Profile::Strict).await?;
//! for result in &results {
//!     println!("{} [{}] {}", result.id, result.status, result.actual);
//! }
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod raw_value;
pub mod remediation;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

use hardline_core::{AuditResult, Policy, Profile, Result, Rule};
use hardline_platform::Hardener;
use hardline_state::{Journal, JOURNAL_FILE};
use std::sync::Arc;

pub use executor::{run_audit, CHECK_TIMEOUT};
pub use remediation::{apply_fix, revert_all, revert_fix, RevertSummary};
pub use scheduler::schedule;

/// Facade over the rule engine: one platform adapter plus one journal.
///
/// The HTTP dashboard, report generator and CLI all drive this surface and
/// nothing below it.
pub struct Engine {
    platform: Arc<dyn Hardener>,
    journal: Journal,
}

impl Engine {
    /// Build an engine over an explicit adapter and journal (tests inject
    /// in-memory substitutes here)
    pub fn new(platform: Arc<dyn Hardener>, journal: Journal) -> Self {
        Self { platform, journal }
    }

    /// Engine over the detected platform and the default journal file
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            hardline_platform::current(),
            Journal::open(JOURNAL_FILE)?,
        ))
    }

    /// OS family of the underlying adapter
    pub fn os_name(&self) -> &'static str {
        self.platform.os_name()
    }

    /// The journal recording applied fixes
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Audit the policy under a severity profile
    pub async fn scan(&self, policy: &Policy, profile: Profile) -> Result<Vec<AuditResult>> {
        let filtered = hardline_policy::filter_policy(policy, profile);
        executor::run_audit(Arc::clone(&self.platform), &filtered).await
    }

    /// Audit for export; identical data to [`scan`](Self::scan), formatting
    /// belongs to the report collaborator
    pub async fn export_audit(
        &self,
        policy: &Policy,
        profile: Profile,
    ) -> Result<Vec<AuditResult>> {
        self.scan(policy, profile).await
    }

    /// Apply a rule's remediation, journaling the before/after pair
    pub fn apply_fix(&self, rule: &Rule) -> Result<()> {
        remediation::apply_fix(self.platform.as_ref(), &self.journal, rule)
    }

    /// Apply a rule's rollback action
    pub fn revert_fix(&self, rule: &Rule) -> Result<()> {
        remediation::revert_fix(self.platform.as_ref(), rule)
    }

    /// Roll back every rule of the policy, counting successes and failures
    pub fn revert_all(&self, policy: &Policy) -> RevertSummary {
        remediation::revert_all(self.platform.as_ref(), policy)
    }
}
