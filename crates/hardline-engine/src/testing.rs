//! In-memory platform adapter for engine tests

use hardline_core::{Result, Scalar};
use hardline_platform::{CommandResult, Hardener};
use std::sync::Mutex;

type CommandFn = dyn Fn(&str, &[String], &str) -> CommandResult + Send + Sync;
type RegistryFn = dyn Fn(&str, &str, &Scalar) -> Result<bool> + Send + Sync;

/// One recorded `run_command` invocation
#[derive(Debug, Clone)]
pub struct CommandCall {
    pub cmd: String,
    pub args: Vec<String>,
    pub expect_pattern: String,
}

/// Scriptable `Hardener` that records every call
pub struct StubHardener {
    on_command: Box<CommandFn>,
    on_registry: Box<RegistryFn>,
    pub calls: Mutex<Vec<CommandCall>>,
    pub edits: Mutex<Vec<(String, String, String)>>,
}

impl StubHardener {
    /// Stub whose command executions are driven by the given closure
    pub fn with_command<F>(f: F) -> Self
    where
        F: Fn(&str, &[String], &str) -> CommandResult + Send + Sync + 'static,
    {
        Self {
            on_command: Box::new(f),
            on_registry: Box::new(|_, _, _| Ok(false)),
            calls: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
        }
    }

    /// Stub where every command passes with the given output
    pub fn passing(output: &str) -> Self {
        let output = output.to_string();
        Self::with_command(move |_, _, _| CommandResult {
            passed: true,
            output: output.clone(),
            exit_code: Some(0),
            error: None,
        })
    }

    /// Replace the registry behavior
    pub fn registry<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &Scalar) -> Result<bool> + Send + Sync + 'static,
    {
        self.on_registry = Box::new(f);
        self
    }
}

impl Hardener for StubHardener {
    fn os_name(&self) -> &'static str {
        "test"
    }

    fn run_command(&self, cmd: &str, args: &[String], expect_pattern: &str) -> CommandResult {
        self.calls.lock().unwrap().push(CommandCall {
            cmd: cmd.to_string(),
            args: args.to_vec(),
            expect_pattern: expect_pattern.to_string(),
        });
        (self.on_command)(cmd, args, expect_pattern)
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
        (self.on_registry)(key_path, value_name, expected)
    }

    fn set_registry(&self, _key_path: &str, _value_name: &str, _value: &Scalar) -> Result<()> {
        Ok(())
    }

    fn edit_config_file(&self, path: &str, search_regex: &str, replace_text: &str) -> Result<()> {
        self.edits.lock().unwrap().push((
            path.to_string(),
            search_regex.to_string(),
            replace_text.to_string(),
        ));
        Ok(())
    }
}
