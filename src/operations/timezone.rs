// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::colors;
use crate::config::Config;
use crate::error::{Result, StepContext};
use crate::shell::{CommandLine, CommandRunner};

/// Force the system clock to UTC
pub async fn set_utc_timezone(_cfg: &Config, runner: &dyn CommandRunner) -> Result<()> {
    colors::info("Setting system timezone to UTC.");
    runner
        .execute(&CommandLine::privileged("timedatectl", ["set-timezone", "UTC"]))
        .await
        .step("failed to set timezone")
}
