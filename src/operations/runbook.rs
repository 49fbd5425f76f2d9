// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sequential runner for a list of operations

use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::Operation;
use crate::config::Config;
use crate::shell::CommandRunner;

/// Runs operations one after another against a single runner
pub struct Runbook<'a> {
    runner: &'a dyn CommandRunner,
    /// Keep going after an operation fails
    continue_on_error: bool,
}

/// Outcome of one operation
#[derive(Debug)]
pub struct StepResult {
    pub operation: Operation,
    pub success: bool,
    /// Error message (if failed)
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Outcome of a whole run
#[derive(Debug)]
pub struct RunReport {
    /// Whether every attempted operation succeeded
    pub success: bool,
    pub step_results: Vec<StepResult>,
    pub total_duration_ms: u64,
    pub succeeded: usize,
    pub failed: usize,
}

impl<'a> Runbook<'a> {
    pub fn new(runner: &'a dyn CommandRunner, continue_on_error: bool) -> Self {
        Self {
            runner,
            continue_on_error,
        }
    }

    /// Run `operations` in order
    pub async fn execute(&self, cfg: &Config, operations: &[Operation]) -> RunReport {
        let start_time = Instant::now();
        let mut step_results = Vec::with_capacity(operations.len());
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        info!(operations = operations.len(), "Starting run");

        for operation in operations {
            debug!(operation = %operation, "Running operation");
            let step_start = Instant::now();
            let outcome = operation.run(cfg, self.runner).await;
            let duration_ms = step_start.elapsed().as_millis() as u64;

            let result = match outcome {
                Ok(()) => {
                    succeeded += 1;
                    info!(operation = %operation, duration_ms, "Operation completed");
                    StepResult {
                        operation: *operation,
                        success: true,
                        error: None,
                        duration_ms,
                    }
                }
                Err(e) => {
                    failed += 1;
                    error!(operation = %operation, error = %e, "Operation failed");
                    StepResult {
                        operation: *operation,
                        success: false,
                        error: Some(e.to_string()),
                        duration_ms,
                    }
                }
            };

            let stop = !result.success && !self.continue_on_error;
            step_results.push(result);
            if stop {
                warn!("Stopping run due to operation failure");
                break;
            }
        }

        let total_duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            succeeded,
            failed,
            duration_ms = total_duration_ms,
            "Run completed"
        );

        RunReport {
            success: failed == 0,
            step_results,
            total_duration_ms,
            succeeded,
            failed,
        }
    }
}
