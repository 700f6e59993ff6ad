//! Linux-family implementation of the platform capability surface

use crate::process::{self, CommandResult};
use crate::Hardener;
use hardline_core::{Error, Result, Scalar};
use regex::RegexBuilder;
use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

/// Hardener for CentOS / Ubuntu / RHEL / Debian hosts
#[derive(Debug, Default)]
pub struct LinuxHardener;

impl LinuxHardener {
    pub fn new() -> Self {
        Self
    }
}

impl Hardener for LinuxHardener {
    fn os_name(&self) -> &'static str {
        "linux"
    }

    fn run_command(&self, cmd: &str, args: &[String], expect_pattern: &str) -> CommandResult {
        process::run_command(cmd, args, expect_pattern)
    }

    fn check_file_permission(
        &self,
        path: &str,
        expected_mode: &str,
        expected_owner: &str,
        expected_group: &str,
    ) -> Result<bool> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            // Missing file is a failed check, not a system error
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(Error::Io(e)),
        };

        if !expected_mode.is_empty() {
            let mode = metadata.permissions().mode() & 0o7777;
            if format!("{:04o}", mode) != expected_mode {
                return Ok(false);
            }
        }

        if !expected_owner.is_empty() && username(metadata.uid()) != expected_owner {
            return Ok(false);
        }

        if !expected_group.is_empty() && groupname(metadata.gid()) != expected_group {
            return Ok(false);
        }

        Ok(true)
    }

    fn set_file_permission(&self, path: &str, mode: &str) -> Result<()> {
        let mode = u32::from_str_radix(mode, 8).map_err(|e| Error::InvalidMode(e.to_string()))?;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
        Ok(())
    }

    fn check_registry(&self, _key_path: &str, _value_name: &str, _expected: &Scalar) -> Result<bool> {
        // No registry on Linux; the check simply does not pass
        Ok(false)
    }

    fn set_registry(&self, _key_path: &str, _value_name: &str, _value: &Scalar) -> Result<()> {
        Ok(())
    }

    fn edit_config_file(&self, path: &str, search_regex: &str, replace_text: &str) -> Result<()> {
        edit_config_file(Path::new(path), search_regex, replace_text)
    }
}

/// Look up a username from a UID via /etc/passwd, falling back to the number
fn username(uid: u32) -> String {
    lookup_id_name("/etc/passwd", uid).unwrap_or_else(|| uid.to_string())
}

/// Look up a group name from a GID via /etc/group, falling back to the number
fn groupname(gid: u32) -> String {
    lookup_id_name("/etc/group", gid).unwrap_or_else(|| gid.to_string())
}

fn lookup_id_name(db: &str, id: u32) -> Option<String> {
    let content = fs::read_to_string(db).ok()?;
    content.lines().find_map(|line| {
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() >= 3 && parts[2].parse::<u32>().ok() == Some(id) {
            Some(parts[0].to_string())
        } else {
            None
        }
    })
}

/// Replace every match of `search_regex` with `replace_text`, or append
/// `replace_text` as a new line when nothing matches.
///
/// A missing file is treated as empty and created with mode 0644; an
/// existing file keeps its mode across the rewrite.
fn edit_config_file(path: &Path, search_regex: &str, replace_text: &str) -> Result<()> {
    let (text, original_mode) = match fs::read_to_string(path) {
        Ok(content) => {
            let mode = fs::metadata(path)?.permissions().mode();
            (content, mode)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (String::new(), 0o644),
        Err(e) => return Err(Error::Io(e)),
    };

    let re = RegexBuilder::new(search_regex)
        .multi_line(true)
        .build()
        .map_err(|e| Error::Regex(e.to_string()))?;

    let new_text = if re.is_match(&text) {
        re.replace_all(&text, replace_text).into_owned()
    } else if !text.is_empty() && !text.ends_with('\n') {
        format!("{}\n{}\n", text, replace_text)
    } else {
        format!("{}{}\n", text, replace_text)
    };

    fs::write(path, new_text)?;
    fs::set_permissions(path, fs::Permissions::from_mode(original_mode))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_edit_replaces_matching_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sysctl.conf");
        fs::write(&path, "kernel.randomize_va_space = 0\nnet.ipv4.ip_forward = 1\n").unwrap();

        edit_config_file(
            &path,
            r"^kernel\.randomize_va_space\s*=.*$",
            "kernel.randomize_va_space = 2",
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("kernel.randomize_va_space = 2"));
        assert!(content.contains("net.ipv4.ip_forward = 1"));
    }

    #[test]
    fn test_edit_appends_when_no_match() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sshd_config");
        fs::write(&path, "Port 22").unwrap();

        edit_config_file(&path, r"^PermitRootLogin\s+.*$", "PermitRootLogin no").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Port 22\nPermitRootLogin no\n");
    }

    #[test]
    fn test_edit_is_idempotent_when_replacement_matches() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sshd_config");
        fs::write(&path, "PermitRootLogin yes\n").unwrap();

        let pattern = r"^PermitRootLogin\s+\w+$";
        edit_config_file(&path, pattern, "PermitRootLogin no").unwrap();
        let once = fs::read_to_string(&path).unwrap();
        edit_config_file(&path, pattern, "PermitRootLogin no").unwrap();
        let twice = fs::read_to_string(&path).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once, "PermitRootLogin no\n");
    }

    #[test]
    fn test_edit_creates_missing_file_with_default_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.conf");

        edit_config_file(&path, r"^fs\.suid_dumpable\s*=.*$", "fs.suid_dumpable = 0").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "fs.suid_dumpable = 0\n"
        );
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_edit_preserves_existing_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("strict.conf");
        fs::write(&path, "value = 1\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        edit_config_file(&path, r"^value\s*=.*$", "value = 2").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_file_permission_check() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("checked");
        fs::write(&path, "x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        let hardener = LinuxHardener::new();
        assert!(hardener
            .check_file_permission(path.to_str().unwrap(), "0600", "", "")
            .unwrap());
        assert!(!hardener
            .check_file_permission(path.to_str().unwrap(), "0644", "", "")
            .unwrap());
        // Missing file is a plain failed check
        assert!(!hardener
            .check_file_permission("/nonexistent/file", "0600", "", "")
            .unwrap());
    }

    #[test]
    fn test_set_file_permission() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modded");
        fs::write(&path, "x").unwrap();

        let hardener = LinuxHardener::new();
        hardener
            .set_file_permission(path.to_str().unwrap(), "0400")
            .unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o400);

        assert!(hardener
            .set_file_permission(path.to_str().unwrap(), "not-octal")
            .is_err());
    }

    #[test]
    fn test_check_file_content_wraps_run_command() {
        let hardener = LinuxHardener::new();
        let passed = hardener
            .check_file_content(
                "echo",
                &[String::from("PermitRootLogin no")],
                "PermitRootLogin",
            )
            .unwrap();
        assert!(passed);
    }

    #[test]
    fn test_registry_is_inert_on_linux() {
        let hardener = LinuxHardener::new();
        let passed = hardener
            .check_registry("HKLM\\Anything", "Value", &Scalar::Int(1))
            .unwrap();
        assert!(!passed);
        hardener
            .set_registry("HKLM\\Anything", "Value", &Scalar::Int(1))
            .unwrap();
    }
}
