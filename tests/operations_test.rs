// SPDX-License-Identifier: AGPL-3.0-or-later
//! Operation sequencing against a scripted host

use std::sync::Mutex;

use async_trait::async_trait;
use vpsetup::operations::{self, Operation, Runbook};
use vpsetup::{CommandLine, CommandRunner, Config, OpenPort, Result, SetupError};

/// Host where only the listed tools exist and commands at the listed
/// positions (0-based, availability checks excluded) exit non-zero
struct ScriptedHost {
    tools: Vec<&'static str>,
    failing_calls: Vec<usize>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedHost {
    fn new(tools: &[&'static str]) -> Self {
        Self {
            tools: tools.to_vec(),
            failing_calls: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_at(mut self, call: usize) -> Self {
        self.failing_calls.push(call);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedHost {
    async fn is_available(&self, name: &str) -> bool {
        self.tools.iter().any(|tool| *tool == name)
    }

    async fn execute(&self, command: &CommandLine) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(command.to_string());

        if self.failing_calls.contains(&index) {
            return Err(SetupError::CommandFailed {
                command: command.to_string(),
                reason: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }

    async fn execute_with_input(&self, command: &CommandLine, _input: &str) -> Result<()> {
        self.execute(command).await
    }
}

fn web_config() -> Config {
    Config {
        open_ports: vec![OpenPort::allow(80), OpenPort::allow(443), OpenPort::limit(22)],
        ..Config::default()
    }
}

#[tokio::test]
async fn test_firewall_on_apt_only_host() {
    let host = ScriptedHost::new(&["apt-get"]);

    operations::setup_firewall(&web_config(), &host).await.unwrap();

    assert_eq!(
        host.calls(),
        vec![
            "sudo apt-get install -y ufw",
            "sudo ufw default deny incoming",
            "sudo ufw default allow outgoing",
            "sudo ufw allow 80",
            "sudo ufw allow 443",
            "sudo ufw limit 22",
            "sudo ufw enable",
        ]
    );
}

#[tokio::test]
async fn test_firewall_fails_if_any_of_seven_fails() {
    for failing in 0..7 {
        let host = ScriptedHost::new(&["apt-get"]).failing_at(failing);
        let result = operations::setup_firewall(&web_config(), &host).await;

        assert!(result.is_err(), "call {} should fail the operation", failing);
        assert_eq!(host.calls().len(), failing + 1);
    }
}

#[tokio::test]
async fn test_firewall_port_failure_names_port() {
    // install, deny, allow-outgoing, 80, then 443 fails
    let host = ScriptedHost::new(&["apt-get"]).failing_at(4);
    let err = operations::setup_firewall(&web_config(), &host)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("failed to open port 443"));
    assert!(!host.calls().iter().any(|c| c == "sudo ufw limit 22"));
}

#[tokio::test]
async fn test_dnf_host_uses_dnf_everywhere() {
    let host = ScriptedHost::new(&["dnf"]);
    let cfg = web_config();

    operations::system_update(&cfg, &host).await.unwrap();
    operations::install_base_packages(&cfg, &host).await.unwrap();

    assert_eq!(
        host.calls(),
        vec![
            "sudo dnf update -y",
            "sudo dnf upgrade -y",
            "sudo dnf install -y rsync kakoune docker.io docker-compose",
        ]
    );
}

#[tokio::test]
async fn test_baseline_runbook() {
    let host = ScriptedHost::new(&["apt-get", "dnf"]);
    let report = Runbook::new(&host, false)
        .execute(
            &web_config(),
            &[
                Operation::UpdateSystem,
                Operation::BasePackages,
                Operation::Timezone,
                Operation::Firewall,
            ],
        )
        .await;

    assert!(report.success);
    assert_eq!(report.succeeded, 4);
    assert_eq!(host.calls().len(), 2 + 1 + 1 + 7);
    assert_eq!(host.calls()[3], "sudo timedatectl set-timezone UTC");
}

#[tokio::test]
async fn test_runbook_stops_on_failed_update() {
    let host = ScriptedHost::new(&["apt-get"]).failing_at(0);
    let report = Runbook::new(&host, false)
        .execute(
            &web_config(),
            &[Operation::UpdateSystem, Operation::Firewall],
        )
        .await;

    assert!(!report.success);
    assert_eq!(report.failed, 1);
    assert_eq!(host.calls(), vec!["sudo apt-get update -y"]);
}
