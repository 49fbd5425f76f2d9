// SPDX-License-Identifier: AGPL-3.0-or-later
//! System package manager detection
//!
//! The package manager is detected fresh by every operation that needs one;
//! the result is never cached.

use std::fmt;

use tracing::debug;

use crate::error::{Result, SetupError};
use crate::shell::{CommandLine, CommandRunner};

/// Supported package manager families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Debian/Ubuntu `apt-get`
    Apt,
    /// Fedora/RHEL `dnf`
    Dnf,
}

impl PackageManager {
    /// Detection order; first available wins
    pub const SUPPORTED: [PackageManager; 2] = [PackageManager::Apt, PackageManager::Dnf];

    /// Executable name
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
        }
    }

    /// Refresh package metadata.
    ///
    /// On dnf this is `dnf update`, which also applies upgrades.
    pub async fn update(&self, runner: &dyn CommandRunner) -> Result<()> {
        runner.execute(&self.command("update", &[])).await
    }

    /// Upgrade installed packages
    pub async fn upgrade(&self, runner: &dyn CommandRunner) -> Result<()> {
        runner.execute(&self.command("upgrade", &[])).await
    }

    /// Install all `packages` in a single invocation
    pub async fn install<S: AsRef<str> + Sync>(
        &self,
        runner: &dyn CommandRunner,
        packages: &[S],
    ) -> Result<()> {
        let names: Vec<&str> = packages.iter().map(AsRef::as_ref).collect();
        runner.execute(&self.command("install", &names)).await
    }

    fn command(&self, verb: &str, packages: &[&str]) -> CommandLine {
        let args = [verb, "-y"].into_iter().chain(packages.iter().copied());
        CommandLine::privileged(self.binary(), args)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Pick the first supported package manager found on PATH
pub async fn get_package_manager(runner: &dyn CommandRunner) -> Result<PackageManager> {
    for candidate in PackageManager::SUPPORTED {
        if runner.is_available(candidate.binary()).await {
            debug!(package_manager = %candidate, "Selected package manager");
            return Ok(candidate);
        }
    }

    Err(SetupError::NoPackageManagerFound)
}
