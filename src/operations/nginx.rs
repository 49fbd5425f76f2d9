// SPDX-License-Identifier: AGPL-3.0-or-later
//! nginx as a reverse proxy in front of the application port

use std::path::Path;

use tracing::info;

use crate::colors;
use crate::config::Config;
use crate::error::{Result, StepContext};
use crate::pm;
use crate::shell::{CommandLine, CommandRunner};

const SITES_AVAILABLE: &str = "/etc/nginx/sites-available";
const SITES_ENABLED: &str = "/etc/nginx/sites-enabled";
const DEFAULT_SITE: &str = "default";

/// Install nginx and publish a proxy site for `cfg.hostname`
pub async fn setup_nginx(cfg: &Config, runner: &dyn CommandRunner) -> Result<()> {
    let manager = pm::get_package_manager(runner).await?;

    colors::info("Installing nginx.");
    manager
        .install(runner, &["nginx"])
        .await
        .step("failed to install nginx")?;

    for verb in ["enable", "start"] {
        runner
            .execute(&CommandLine::privileged("systemctl", [verb, "nginx"]))
            .await
            .with_step(|| format!("failed to {} nginx", verb))?;
    }

    colors::info("Preparing site directories.");
    runner
        .execute(&CommandLine::privileged(
            "mkdir",
            ["-p", SITES_AVAILABLE, SITES_ENABLED],
        ))
        .await
        .step("failed to create nginx site directories")?;

    colors::info("Removing default nginx site.");
    let defaults = [SITES_AVAILABLE, SITES_ENABLED].map(|dir| site_path(dir, DEFAULT_SITE));
    runner
        .execute(&CommandLine::privileged(
            "rm",
            ["-f", defaults[0].as_str(), defaults[1].as_str()],
        ))
        .await
        .step("failed to remove default nginx site")?;

    let available = site_path(SITES_AVAILABLE, &cfg.hostname);
    let enabled = site_path(SITES_ENABLED, &cfg.hostname);

    colors::info(&format!("Creating site entry at {}.", available));
    runner
        .execute_with_input(
            &CommandLine::privileged("tee", [available.as_str()]),
            &site_config(&cfg.hostname, cfg.app_port),
        )
        .await
        .with_step(|| format!("failed to write site config {}", available))?;

    colors::info(&format!("Linking config to {}.", enabled));
    runner
        .execute(&CommandLine::privileged(
            "ln",
            ["-sf", available.as_str(), enabled.as_str()],
        ))
        .await
        .step("failed to enable nginx site")?;

    info!(hostname = %cfg.hostname, port = cfg.app_port, "nginx site published");
    reload_nginx(cfg, runner).await
}

/// Ask the running nginx to re-read its configuration
pub async fn reload_nginx(_cfg: &Config, runner: &dyn CommandRunner) -> Result<()> {
    colors::info("Reloading nginx configs.");
    runner
        .execute(&CommandLine::privileged("nginx", ["-s", "reload"]))
        .await
        .step("failed to reload nginx")
}

fn site_path(dir: &str, name: &str) -> String {
    Path::new(dir).join(name).display().to_string()
}

/// Server block proxying `hostname` to the local application
pub fn site_config(hostname: &str, app_port: u16) -> String {
    format!(
        r#"server {{
    server_name {hostname};
    location / {{
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header Host $host;
        proxy_pass http://127.0.0.1:{app_port};
        proxy_http_version 1.1;
        proxy_set_header Upgrade $http_upgrade;
        proxy_set_header Connection "upgrade";
    }}

    gzip on;
    gzip_types text/css application/javascript image/png image/jpeg image/webp;
    gzip_proxied any;
}}
"#
    )
}
