// SPDX-License-Identifier: AGPL-3.0-or-later

use tracing::info;

use crate::colors;
use crate::config::Config;
use crate::error::{Result, StepContext};
use crate::pm;
use crate::shell::CommandRunner;

/// Install the configured base packages with one package-manager call
pub async fn install_base_packages(cfg: &Config, runner: &dyn CommandRunner) -> Result<()> {
    let manager = pm::get_package_manager(runner).await?;

    colors::info("installing base packages.");
    info!(package_manager = %manager, packages = ?cfg.base_packages, "Installing base packages");
    manager
        .install(runner, &cfg.base_packages)
        .await
        .step("failed to install base packages")
}
