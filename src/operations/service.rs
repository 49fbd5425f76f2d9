// SPDX-License-Identifier: AGPL-3.0-or-later
//! systemd unit for the application

use std::path::{Path, PathBuf};

use crate::colors;
use crate::config::Config;
use crate::error::{Result, StepContext};
use crate::shell::{CommandLine, CommandRunner};

const UNIT_DIR: &str = "/etc/systemd/system";

/// Write the application's unit file and reload systemd
pub async fn setup_service(cfg: &Config, runner: &dyn CommandRunner) -> Result<()> {
    let path = unit_path(&cfg.app_service_name);
    let path = path.display().to_string();

    colors::info(&format!("Writing systemd service {}.", path));
    runner
        .execute_with_input(&CommandLine::privileged("tee", [path.as_str()]), &unit_file(cfg))
        .await
        .with_step(|| format!("failed to write systemd service {}", path))?;

    reload_systemd(cfg, runner).await
}

/// `systemctl daemon-reload`
pub async fn reload_systemd(_cfg: &Config, runner: &dyn CommandRunner) -> Result<()> {
    colors::info("Reloading systemd configs.");
    runner
        .execute(&CommandLine::privileged("systemctl", ["daemon-reload"]))
        .await
        .step("failed to reload systemd")
}

pub fn unit_path(service_name: &str) -> PathBuf {
    Path::new(UNIT_DIR).join(format!("{}.service", service_name))
}

pub fn unit_file(cfg: &Config) -> String {
    format!(
        "[Unit]\n\
         Description={name}\n\
         After=network.target\n\
         \n\
         [Service]\n\
         ExecStart={start}\n\
         WorkingDirectory={dir}\n\
         Type=simple\n\
         Restart=always\n\
         \n\
         [Install]\n\
         WantedBy=default.target\n",
        name = cfg.app_service_name,
        start = cfg.app_start_cmd,
        dir = cfg.app_dir.display(),
    )
}
