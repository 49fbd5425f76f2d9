// SPDX-License-Identifier: AGPL-3.0-or-later

use tracing::info;

use crate::colors;
use crate::config::Config;
use crate::error::{Result, StepContext};
use crate::pm;
use crate::shell::CommandRunner;

/// Refresh package lists, then upgrade installed packages
pub async fn system_update(_cfg: &Config, runner: &dyn CommandRunner) -> Result<()> {
    let manager = pm::get_package_manager(runner).await?;
    info!(package_manager = %manager, "Updating system");

    colors::info("updating package lists.");
    manager
        .update(runner)
        .await
        .step("failed to update package lists")?;

    colors::info("upgrading system packages.");
    manager
        .upgrade(runner)
        .await
        .step("failed to upgrade system packages")
}
