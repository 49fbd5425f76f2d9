// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provisioning operations
//!
//! Each operation takes the configuration and a [`CommandRunner`], issues a
//! fixed sequence of commands, and stops at the first one that fails.

mod base_packages;
mod firewall;
mod nginx;
mod runbook;
mod service;
mod system_update;
mod timezone;

pub use base_packages::install_base_packages;
pub use firewall::setup_firewall;
pub use nginx::{reload_nginx, setup_nginx, site_config};
pub use runbook::{Runbook, RunReport, StepResult};
pub use service::{reload_systemd, setup_service, unit_file, unit_path};
pub use system_update::system_update;
pub use timezone::set_utc_timezone;

use std::fmt;
use std::str::FromStr;

use crate::config::Config;
use crate::error::{Result, SetupError};
use crate::shell::CommandRunner;

/// Every operation the tool can run, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UpdateSystem,
    BasePackages,
    Timezone,
    Nginx,
    ReloadNginx,
    Firewall,
    Service,
    ReloadSystemd,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::UpdateSystem,
        Operation::BasePackages,
        Operation::Timezone,
        Operation::Nginx,
        Operation::ReloadNginx,
        Operation::Firewall,
        Operation::Service,
        Operation::ReloadSystemd,
    ];

    /// Name accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Operation::UpdateSystem => "update-system",
            Operation::BasePackages => "base-packages",
            Operation::Timezone => "timezone",
            Operation::Nginx => "nginx",
            Operation::ReloadNginx => "reload-nginx",
            Operation::Firewall => "firewall",
            Operation::Service => "service",
            Operation::ReloadSystemd => "reload-systemd",
        }
    }

    /// Menu label
    pub fn title(&self) -> &'static str {
        match self {
            Operation::UpdateSystem => "Upgrade system",
            Operation::BasePackages => "Install base packages",
            Operation::Timezone => "Set timezone (UTC)",
            Operation::Nginx => "Setup Nginx",
            Operation::ReloadNginx => "Reload Nginx",
            Operation::Firewall => "Setup firewall",
            Operation::Service => "Setup SystemD Service",
            Operation::ReloadSystemd => "Reload SystemD",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::UpdateSystem => "Refresh package lists and upgrade installed packages",
            Operation::BasePackages => "Install the configured base packages",
            Operation::Timezone => "Set the system timezone to UTC",
            Operation::Nginx => "Install nginx and proxy the hostname to the app port",
            Operation::ReloadNginx => "Reload the nginx configuration",
            Operation::Firewall => "Install ufw, deny incoming, open the configured ports",
            Operation::Service => "Write the app's systemd unit and reload systemd",
            Operation::ReloadSystemd => "Run systemctl daemon-reload",
        }
    }

    /// Run this operation against the host
    pub async fn run(&self, cfg: &Config, runner: &dyn CommandRunner) -> Result<()> {
        match self {
            Operation::UpdateSystem => system_update(cfg, runner).await,
            Operation::BasePackages => install_base_packages(cfg, runner).await,
            Operation::Timezone => set_utc_timezone(cfg, runner).await,
            Operation::Nginx => setup_nginx(cfg, runner).await,
            Operation::ReloadNginx => reload_nginx(cfg, runner).await,
            Operation::Firewall => setup_firewall(cfg, runner).await,
            Operation::Service => setup_service(cfg, runner).await,
            Operation::ReloadSystemd => reload_systemd(cfg, runner).await,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        // a few aliases matching the function names operators tend to type
        let wanted = match wanted.as_str() {
            "update" | "upgrade" | "upgrade-system" | "system-update" => "update-system",
            "packages" | "base" => "base-packages",
            "tz" | "utc" => "timezone",
            "ufw" => "firewall",
            "systemd" => "service",
            other => other,
        };

        Operation::ALL
            .into_iter()
            .find(|op| op.name() == wanted)
            .ok_or_else(|| SetupError::UnknownOperation(s.to_string()))
    }
}
