// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recording command runner for unit tests

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, SetupError};
use crate::shell::{CommandLine, CommandRunner};

/// Pretends a fixed set of tools is installed and records everything it is asked to run
#[derive(Debug, Default)]
pub struct FakeRunner {
    tools: HashSet<String>,
    fail_patterns: Vec<String>,
    lookups: Mutex<Vec<String>>,
    commands: Mutex<Vec<String>>,
    inputs: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn with_tools(tools: &[&str]) -> Self {
        Self {
            tools: tools.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Fail every command whose rendered form contains `pattern`
    pub fn fail_on(mut self, pattern: &str) -> Self {
        self.fail_patterns.push(pattern.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    fn record(&self, command: &CommandLine) -> Result<()> {
        let rendered = command.to_string();
        self.commands.lock().unwrap().push(rendered.clone());

        if self.fail_patterns.iter().any(|p| rendered.contains(p.as_str())) {
            return Err(SetupError::CommandFailed {
                command: rendered,
                reason: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn is_available(&self, name: &str) -> bool {
        self.lookups.lock().unwrap().push(name.to_string());
        self.tools.contains(name)
    }

    async fn execute(&self, command: &CommandLine) -> Result<()> {
        self.record(command)
    }

    async fn execute_with_input(&self, command: &CommandLine, input: &str) -> Result<()> {
        self.inputs.lock().unwrap().push(input.to_string());
        self.record(command)
    }
}
