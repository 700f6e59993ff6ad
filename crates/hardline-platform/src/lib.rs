//! Hardline Platform - uniform capability surface per OS
//!
//! The engine consumes one trait, `Hardener`, and never branches on the OS
//! itself. `LinuxHardener` covers the Linux family (commands, file
//! permissions, config-file edits); `WindowsHardener` adds registry access.
//! The local security policy (user rights) lives in [`secedit`], which is
//! tool-driven and shared.
//!
//! A process-wide singleton is selected at first use via [`current`];
//! tests construct substitute implementations directly.

pub mod process;
pub mod secedit;

#[cfg(unix)]
pub mod linux;

#[cfg(windows)]
pub mod windows;

use hardline_core::{Result, Scalar};
use std::sync::{Arc, OnceLock};

#[cfg(unix)]
pub use linux::LinuxHardener;
pub use process::CommandResult;
pub use secedit::SeceditManager;

#[cfg(windows)]
pub use windows::WindowsHardener;

/// The capability surface the engine runs checks and fixes through.
///
/// Methods are `&self` and stateless apart from OS side effects, so one
/// instance is safe for concurrent calls.
pub trait Hardener: Send + Sync {
    /// Short OS family name ("linux", "windows")
    fn os_name(&self) -> &'static str;

    /// Execute a command in audit mode (pattern non-empty) or action mode
    /// (pattern empty). Never panics; audit-mode failures are values, not
    /// errors. See [`CommandResult`].
    fn run_command(&self, cmd: &str, args: &[String], expect_pattern: &str) -> CommandResult;

    /// Thin wrapper over `run_command` for content checks
    fn check_file_content(&self, cmd: &str, args: &[String], expect_pattern: &str) -> Result<bool> {
        let outcome = self.run_command(cmd, args, expect_pattern);
        match outcome.error {
            Some(e) => Err(hardline_core::Error::Adapter(e)),
            None => Ok(outcome.passed),
        }
    }

    /// Check a file's octal mode and (optionally) owner/group
    fn check_file_permission(
        &self,
        path: &str,
        expected_mode: &str,
        expected_owner: &str,
        expected_group: &str,
    ) -> Result<bool>;

    /// chmod-equivalent with an octal mode string
    fn set_file_permission(&self, path: &str, mode: &str) -> Result<()>;

    /// Compare a registry value against an expected scalar. Windows only;
    /// missing keys/values read as a plain failed check, not an error.
    fn check_registry(&self, key_path: &str, value_name: &str, expected: &Scalar) -> Result<bool>;

    /// Write a registry value, materializing missing subkeys. Windows only.
    fn set_registry(&self, key_path: &str, value_name: &str, value: &Scalar) -> Result<()>;

    /// Regex-replace or append a line in a text config file. Linux focus;
    /// no-op on Windows.
    fn edit_config_file(&self, path: &str, search_regex: &str, replace_text: &str) -> Result<()>;
}

static PLATFORM: OnceLock<Arc<dyn Hardener>> = OnceLock::new();

/// The process-wide platform adapter, selected once at first use.
pub fn current() -> Arc<dyn Hardener> {
    PLATFORM
        .get_or_init(|| {
            #[cfg(windows)]
            {
                Arc::new(WindowsHardener::new())
            }
            #[cfg(not(windows))]
            {
                Arc::new(LinuxHardener::new())
            }
        })
        .clone()
}
