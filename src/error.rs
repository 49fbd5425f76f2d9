// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for vpsetup

use thiserror::Error;

/// Result type alias for vpsetup operations
pub type Result<T> = std::result::Result<T, SetupError>;

/// Errors that can occur while provisioning a host
#[derive(Error, Debug)]
pub enum SetupError {
    /// Required environment variable absent or blank
    #[error("failed to read ${var} from environment")]
    EnvironmentMissing { var: String },

    /// Neither apt-get nor dnf resolved on PATH
    #[error("no supported package manager found")]
    NoPackageManagerFound,

    /// A spawned command exited non-zero or could not be spawned
    #[error("command failed: `{command}`: {reason}")]
    CommandFailed { command: String, reason: String },

    /// Blank answer at an interactive prompt
    #[error("empty input")]
    EmptyInput,

    /// Reading an interactive prompt failed
    #[error("failed to read user input: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// A lower-level failure annotated with the step that was attempted
    #[error("{context}: {source}")]
    Step {
        context: String,
        #[source]
        source: Box<SetupError>,
    },

    /// Menu selection out of range or not a number
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Operation name not recognised
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration values
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SetupError {
    /// Wrap this error with a description of the step that failed
    pub fn context(self, context: impl Into<String>) -> Self {
        SetupError::Step {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any `Step` wrappers
    pub fn root_cause(&self) -> &SetupError {
        match self {
            SetupError::Step { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Attach step context to a `Result`, mirroring `anyhow::Context` for `SetupError`
pub trait StepContext<T> {
    fn step(self, context: impl Into<String>) -> Result<T>;

    fn with_step<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> StepContext<T> for Result<T> {
    fn step(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_step<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}
