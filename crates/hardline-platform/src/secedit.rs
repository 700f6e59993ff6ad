//! Local security policy (user rights) management via secedit
//!
//! User rights are read by exporting the current security template and
//! parsing its `[Privilege Rights]` lines, and written by importing a
//! minimal template against a throwaway database. The tool uses fixed
//! temporary filenames, so all operations serialize on a single-slot
//! process-wide lock and the temp files are removed on every exit path.

use hardline_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

static SECEDIT_LOCK: Mutex<()> = Mutex::new(());

/// The assignment value that clears a user right entirely
pub const NO_ONE: &str = "No One";

/// Manager for named user-right (privilege) assignments
pub struct SeceditManager {
    export_path: PathBuf,
    import_path: PathBuf,
    db_path: PathBuf,
}

impl Default for SeceditManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SeceditManager {
    pub fn new() -> Self {
        Self {
            export_path: PathBuf::from("temp_export.inf"),
            import_path: PathBuf::from("temp_import.inf"),
            db_path: PathBuf::from("temp_secedit.sdb"),
        }
    }

    /// Verify that a user right carries the expected principals.
    ///
    /// Expecting `"No One"` (or an empty string) passes only when the right
    /// is unassigned. Otherwise every comma-separated expected principal
    /// must appear in the current assignment.
    pub fn check_user_right(&self, right_name: &str, expected: &str) -> Result<bool> {
        let _guard = SECEDIT_LOCK.lock().unwrap();

        let status = Command::new("secedit")
            .args(["/export", "/cfg"])
            .arg(&self.export_path)
            .args(["/areas", "USER_RIGHTS"])
            .status()
            .map_err(|e| Error::Adapter(format!("secedit export failed: {}", e)))?;
        let _export_cleanup = TempCleanup(&self.export_path);

        if !status.success() {
            return Err(Error::Adapter(format!(
                "secedit export failed with {}",
                status
            )));
        }

        // secedit writes UTF-16 templates on real systems; a lossy read is
        // enough for line scanning
        let data = fs::read(&self.export_path)?;
        let content = String::from_utf8_lossy(&data).into_owned();

        let current = parse_right_assignment(&content, right_name).unwrap_or_default();
        Ok(principals_satisfied(&current, expected))
    }

    /// Assign (or clear, with `"No One"`) the principals of a user right
    pub fn set_user_right(&self, right_name: &str, users: &str) -> Result<()> {
        let _guard = SECEDIT_LOCK.lock().unwrap();

        let value = if users == NO_ONE { "" } else { users };
        let inf = format!(
            "[Unicode]\r\nUnicode=yes\r\n[Privilege Rights]\r\n{} = {}\r\n[Version]\r\nsignature=\"$CHICAGO$\"\r\nRevision=1\r\n",
            right_name, value
        );

        fs::write(&self.import_path, inf)?;
        let _import_cleanup = TempCleanup(&self.import_path);
        let _db_cleanup = TempCleanup(&self.db_path);

        let output = Command::new("secedit")
            .args(["/configure", "/db"])
            .arg(&self.db_path)
            .args(["/cfg"])
            .arg(&self.import_path)
            .args(["/areas", "USER_RIGHTS"])
            .output()
            .map_err(|e| Error::Adapter(format!("secedit configure failed: {}", e)))?;

        if !output.status.success() {
            let combined = String::from_utf8_lossy(&output.stdout);
            return Err(Error::Adapter(format!(
                "secedit configure failed: {}",
                combined.trim()
            )));
        }
        Ok(())
    }
}

/// Removes the wrapped path when dropped, on every exit path
struct TempCleanup<'a>(&'a Path);

impl Drop for TempCleanup<'_> {
    fn drop(&mut self) {
        let _ = fs::remove_file(self.0);
    }
}

/// Extract the right-hand side of a `RightName = principals` template line
fn parse_right_assignment(content: &str, right_name: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.trim();
        if line.contains(right_name) && line.contains('=') {
            line.split_once('=').map(|(_, rhs)| rhs.trim().to_string())
        } else {
            None
        }
    })
}

/// Whether the current assignment satisfies the expected principals
fn principals_satisfied(current: &str, expected: &str) -> bool {
    if expected == NO_ONE || expected.is_empty() {
        return current.is_empty();
    }

    expected
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .all(|principal| current.contains(principal))
}
