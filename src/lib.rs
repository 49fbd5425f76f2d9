// SPDX-License-Identifier: AGPL-3.0-or-later
//! vpsetup: bring a fresh Linux server to a baseline secure state
//!
//! Detects the system package manager, updates and upgrades packages,
//! installs a base package set, forces the clock to UTC and configures a
//! default-deny ufw firewall with a small allow-list of ports. Optional
//! operations put nginx in front of the application and install its
//! systemd unit.
//!
//! # Features
//!
//! * **Package manager detection:** apt-get first, dnf second, re-detected per operation
//! * **Firewall sequencing:** install, default policies, ports in order, enable
//! * **Audit trail:** every side-effecting step is announced before it runs

pub mod colors;
pub mod config;
pub mod env;
pub mod error;
pub mod menu;
pub mod operations;
pub mod pm;
pub mod shell;

#[cfg(test)]
mod testing;

pub use config::{Config, OpenPort, RuleKind};
pub use error::{Result, SetupError};
pub use operations::Operation;
pub use pm::PackageManager;
pub use shell::{CommandLine, CommandRunner, SystemShell};
