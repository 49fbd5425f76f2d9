// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration management for vpsetup

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};

/// Main configuration structure for a provisioning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Public hostname served by nginx
    pub hostname: String,

    /// Local port the application listens on
    pub app_port: u16,

    /// Application working directory
    pub app_dir: PathBuf,

    /// systemd unit name for the application
    pub app_service_name: String,

    /// Command systemd runs to start the application
    pub app_start_cmd: String,

    /// Packages installed by the base-packages step, in install order
    pub base_packages: Vec<String>,

    /// Firewall rules applied in order
    pub open_ports: Vec<OpenPort>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// How ufw treats an opened port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Accept all traffic on the port
    Allow,
    /// Accept traffic but rate-limit repeated connections
    Limit,
}

impl RuleKind {
    /// The ufw sub-verb for this rule
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Allow => "allow",
            RuleKind::Limit => "limit",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single firewall rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPort {
    pub kind: RuleKind,
    pub port: u16,
}

impl OpenPort {
    pub fn allow(port: u16) -> Self {
        Self {
            kind: RuleKind::Allow,
            port,
        }
    }

    pub fn limit(port: u16) -> Self {
        Self {
            kind: RuleKind::Limit,
            port,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: "example.com".to_string(),
            app_port: 3000,
            app_dir: Path::new("/").join("admin").join("app"),
            app_service_name: "MyApp".to_string(),
            app_start_cmd: "npm run start".to_string(),
            base_packages: ["rsync", "kakoune", "docker.io", "docker-compose"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            open_ports: vec![
                OpenPort::allow(80),  // http
                OpenPort::allow(443), // https
                OpenPort::limit(22),  // ssh
            ],
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Fields missing from the file keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SetupError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.app_service_name.trim().is_empty() {
            return Err(SetupError::InvalidConfig {
                message: "app_service_name cannot be empty".to_string(),
            });
        }

        if let Some(rule) = self.open_ports.iter().find(|p| p.port == 0) {
            return Err(SetupError::InvalidConfig {
                message: format!("cannot {} port 0", rule.kind),
            });
        }

        Ok(())
    }

    /// Soft problems worth telling the operator about before running anything
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.hostname.contains('.') {
            warnings.push(format!("invalid hostname (i.e. {})", self.hostname));
        }

        if self.app_port == 0 {
            warnings.push(format!("invalid app port (i.e. {})", self.app_port));
        }

        if !self.app_dir.exists() {
            warnings.push(format!(
                "app dir (i.e. {}) does not exist",
                self.app_dir.display()
            ));
        }

        if self.app_start_cmd.len() < 4 {
            warnings.push(format!(
                "app start command may be invalid (i.e. {})",
                self.app_start_cmd
            ));
        }

        if self.app_service_name.len() < 4 {
            warnings.push(format!(
                "app (systemd) service name may be invalid (i.e. {})",
                self.app_service_name
            ));
        }

        warnings
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
