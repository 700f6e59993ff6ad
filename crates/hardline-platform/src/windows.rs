//! Windows implementation of the platform capability surface
//!
//! Registry access shells out to `reg.exe` and parses its query output.
//! File permissions are ACL territory on Windows and are expected to be
//! handled through command-type rules (icacls), so those methods are inert.

use crate::process::{self, CommandResult};
use crate::Hardener;
use hardline_core::{Error, Result, Scalar};
use std::process::Command;

/// Hardener for Windows hosts
#[derive(Debug, Default)]
pub struct WindowsHardener;

impl WindowsHardener {
    pub fn new() -> Self {
        Self
    }
}

impl Hardener for WindowsHardener {
    fn os_name(&self) -> &'static str {
        "windows"
    }

    fn run_command(&self, cmd: &str, args: &[String], expect_pattern: &str) -> CommandResult {
        process::run_command(cmd, args, expect_pattern)
    }

    fn check_file_permission(
        &self,
        _path: &str,
        _expected_mode: &str,
        _expected_owner: &str,
        _expected_group: &str,
    ) -> Result<bool> {
        Ok(true)
    }

    fn set_file_permission(&self, _path: &str, _mode: &str) -> Result<()> {
        Ok(())
    }

    fn check_registry(&self, key_path: &str, value_name: &str, expected: &Scalar) -> Result<bool> {
        validate_root_key(key_path)?;

        let output = Command::new("reg")
            .args(["query", key_path, "/v", value_name])
            .output()
            .map_err(|e| Error::Adapter(format!("failed to run reg query: {}", e)))?;

        // Missing key or value is a failed check, not an error
        if !output.status.success() {
            return Ok(false);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(actual) = parse_reg_query_output(&stdout, value_name) else {
            return Ok(false);
        };

        Ok(match (&actual, expected) {
            (RegValue::Int(actual), expected) => expected.as_int() == Some(*actual),
            (RegValue::Str(actual), Scalar::Str(expected)) => actual == expected,
            _ => false,
        })
    }

    fn set_registry(&self, key_path: &str, value_name: &str, value: &Scalar) -> Result<()> {
        validate_root_key(key_path)?;

        // reg add creates missing subkeys, so this is create-or-open
        let (reg_type, data) = match value {
            Scalar::Int(v) => ("REG_DWORD", v.to_string()),
            Scalar::Float(v) => ("REG_DWORD", (*v as i64).to_string()),
            Scalar::Str(s) => ("REG_SZ", s.clone()),
        };

        let output = Command::new("reg")
            .args([
                "add",
                key_path,
                "/v",
                value_name,
                "/t",
                reg_type,
                "/d",
                data.as_str(),
                "/f",
            ])
            .output()
            .map_err(|e| Error::Adapter(format!("failed to run reg add: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Adapter(format!(
                "reg add {}\\{} failed: {}",
                key_path,
                value_name,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn edit_config_file(&self, _path: &str, _search_regex: &str, _replace_text: &str) -> Result<()> {
        // Config-file edits are a Linux concern
        Ok(())
    }
}

fn validate_root_key(key_path: &str) -> Result<()> {
    if key_path.starts_with("HKLM\\") || key_path.starts_with("HKCU\\") {
        Ok(())
    } else {
        Err(Error::UnsupportedRootKey(key_path.to_string()))
    }
}

/// Parsed registry value from reg.exe output
#[derive(Debug, PartialEq)]
enum RegValue {
    Int(i64),
    Str(String),
}

/// Pull the named value out of `reg query` output.
///
/// Lines look like `    ValueName    REG_DWORD    0x18`.
fn parse_reg_query_output(output: &str, value_name: &str) -> Option<RegValue> {
    for line in output.lines() {
        let line = line.trim();
        if !line.starts_with(value_name) {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let type_pos = parts.iter().position(|p| p.starts_with("REG_"))?;
        let reg_type = parts[type_pos];
        let data = parts[type_pos + 1..].join(" ");

        return match reg_type {
            "REG_DWORD" | "REG_QWORD" => {
                let hex = data.trim_start_matches("0x");
                i64::from_str_radix(hex, 16).ok().map(RegValue::Int)
            }
            "REG_SZ" | "REG_EXPAND_SZ" => Some(RegValue::Str(data)),
            _ => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_root_key() {
        assert!(validate_root_key("HKLM\\SOFTWARE\\Test").is_ok());
        assert!(validate_root_key("HKCU\\SOFTWARE\\Test").is_ok());
        assert!(validate_root_key("HKCR\\Anything").is_err());
    }

    #[test]
    fn test_parse_dword() {
        let output = "\r\nHKEY_LOCAL_MACHINE\\SOFTWARE\\Test\r\n    EnableFirewall    REG_DWORD    0x1\r\n";
        assert_eq!(
            parse_reg_query_output(output, "EnableFirewall"),
            Some(RegValue::Int(1))
        );
    }

    #[test]
    fn test_parse_string_with_spaces() {
        let output = "    LegalNoticeText    REG_SZ    Authorized use only\r\n";
        assert_eq!(
            parse_reg_query_output(output, "LegalNoticeText"),
            Some(RegValue::Str(String::from("Authorized use only")))
        );
    }

    #[test]
    fn test_parse_missing_value() {
        assert!(parse_reg_query_output("    Other    REG_DWORD    0x1", "Wanted").is_none());
    }
}
