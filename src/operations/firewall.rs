// SPDX-License-Identifier: AGPL-3.0-or-later
//! ufw setup: default-deny incoming, allow outgoing, then open the configured ports
//!
//! Steps run strictly in order and stop at the first failure. Nothing is rolled
//! back: a failure after `default deny incoming` leaves the host denying both
//! directions until the operation is rerun.

use tracing::{debug, info};

use crate::colors;
use crate::config::{Config, OpenPort};
use crate::error::{Result, StepContext};
use crate::pm::{self, PackageManager};
use crate::shell::{CommandLine, CommandRunner};

const FIREWALL_PACKAGE: &str = "ufw";

/// Install ufw and apply the configured rule set
pub async fn setup_firewall(cfg: &Config, runner: &dyn CommandRunner) -> Result<()> {
    let manager = pm::get_package_manager(runner).await?;

    install_firewall(manager, runner).await?;
    close_incoming_allow_outgoing(runner).await?;
    open_selective_ports(&cfg.open_ports, runner).await?;
    enable_firewall(runner).await?;

    info!(ports = cfg.open_ports.len(), "Firewall configured");
    Ok(())
}

async fn install_firewall(manager: PackageManager, runner: &dyn CommandRunner) -> Result<()> {
    colors::info("Installing firewall.");
    manager
        .install(runner, &[FIREWALL_PACKAGE])
        .await
        .step("failed to install firewall")
}

async fn close_incoming_allow_outgoing(runner: &dyn CommandRunner) -> Result<()> {
    colors::info("Closing incoming connections.");
    runner
        .execute(&ufw(["default", "deny", "incoming"]))
        .await
        .step("failed to close incoming connections")?;

    colors::info("Allowing outgoing connections.");
    runner
        .execute(&ufw(["default", "allow", "outgoing"]))
        .await
        .step("failed to allow outgoing connections")
}

async fn open_selective_ports(ports: &[OpenPort], runner: &dyn CommandRunner) -> Result<()> {
    for rule in ports {
        colors::info(&format!("Opening port {}.", rule.port));
        debug!(kind = %rule.kind, port = rule.port, "Applying firewall rule");

        let port = rule.port.to_string();
        runner
            .execute(&ufw([rule.kind.as_str(), port.as_str()]))
            .await
            .with_step(|| format!("failed to open port {}", rule.port))?;
    }

    Ok(())
}

async fn enable_firewall(runner: &dyn CommandRunner) -> Result<()> {
    colors::info("Enabling firewall.");
    runner
        .execute(&ufw(["enable"]))
        .await
        .step("failed to enable firewall")
}

fn ufw<const N: usize>(args: [&str; N]) -> CommandLine {
    CommandLine::privileged("ufw", args)
}
