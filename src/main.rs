// SPDX-License-Identifier: AGPL-3.0-or-later
//! vpsetup: baseline provisioning for fresh Linux servers

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vpsetup::{
    colors, env, menu,
    operations::{Operation, Runbook},
    Config, SystemShell,
};

/// vpsetup: bring a fresh Linux server to a baseline secure state
///
/// Updates packages, installs a base package set, sets the clock to UTC and
/// configures a default-deny firewall.
#[derive(Parser, Debug)]
#[command(name = "vpsetup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "vpsetup.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Dry run mode (print commands instead of running them)
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one or more operations in the given order
    Run {
        /// Operations to run (see `vpsetup list`)
        #[arg(required = true)]
        operations: Vec<Operation>,

        /// Keep going after an operation fails
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Pick operations from an interactive menu
    Menu,

    /// List available operations
    #[command(alias = "ls")]
    List,

    /// Show configuration
    Config,

    /// Initialize a new vpsetup configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show the invoking user and their home directory
    Whoami,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loaded before logging so the file's level can act as the default.
    let config = if cli.command.needs_config() {
        Config::load_or_default(&cli.config)
            .with_context(|| format!("Failed to load config from {}", cli.config.display()))?
    } else {
        Config::default()
    };

    init_logging(&cli, &config);

    match cli.command {
        Commands::Version => {
            println!("vpsetup v{}", env!("CARGO_PKG_VERSION"));
            println!("Baseline provisioning for fresh Linux servers");
            Ok(())
        }

        Commands::Init { force } => init_config(&cli.config, force),

        Commands::Config => show_config(&cli.config, &config),

        Commands::List => {
            list_operations();
            Ok(())
        }

        Commands::Whoami => whoami(),

        Commands::Menu => {
            install_interrupt_handler();
            report_warnings(&config);
            let shell = SystemShell::new(cli.dry_run);
            let stdin = std::io::stdin();
            // unlocked so the interrupt handler can still print
            menu::run_menu(&mut stdin.lock(), &mut std::io::stdout(), &config, &shell)
                .await
                .context("Menu aborted")
        }

        Commands::Run {
            operations,
            continue_on_error,
        } => {
            install_interrupt_handler();
            run_operations(&config, &operations, continue_on_error, cli.dry_run).await
        }
    }
}

impl Commands {
    /// Whether the command reads the configuration file.
    /// `init` must work even when the existing file no longer parses.
    fn needs_config(&self) -> bool {
        matches!(self, Commands::Run { .. } | Commands::Menu | Commands::Config)
    }
}

/// Exit with status 130 on ctrl+c instead of dying mid-prompt
fn install_interrupt_handler() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted");
            println!("\n{}ctrl+c: exiting...{}", colors::YELLOW, colors::RESET);
            std::process::exit(130);
        }
    });
}

fn init_logging(cli: &Cli, config: &Config) {
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();
}

/// Print soft configuration problems before touching the host
fn report_warnings(config: &Config) {
    for warning in config.warnings() {
        warn!(%warning, "Configuration warning");
        colors::warning(&warning);
    }
}

/// Initialize a new configuration file
fn init_config(config_path: &Path, force: bool) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let body = toml::to_string_pretty(&Config::default())?;
    let contents = format!(
        "# SPDX-License-Identifier: AGPL-3.0-or-later\n# vpsetup configuration\n\n{}",
        body
    );

    std::fs::write(config_path, contents)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    info!("Created configuration file: {}", config_path.display());
    println!("Created configuration file: {}", config_path.display());
    Ok(())
}

/// Show the effective configuration
fn show_config(config_path: &Path, config: &Config) -> anyhow::Result<()> {
    if !config_path.exists() {
        println!("No configuration file found. Using defaults:");
        println!();
    }

    println!("{}", toml::to_string_pretty(config)?);

    let warnings = config.warnings();
    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }
    Ok(())
}

fn list_operations() {
    println!("Available operations:");
    println!();
    for op in Operation::ALL {
        println!("  {:<16} {}", op.name(), op.description());
    }
}

fn whoami() -> anyhow::Result<()> {
    let username = env::get_username()?;
    println!("User: {}", username);
    println!("Home: {}", env::get_home_path(&username).display());
    Ok(())
}

async fn run_operations(
    config: &Config,
    operations: &[Operation],
    continue_on_error: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    report_warnings(config);

    if dry_run {
        println!("[DRY RUN] Would run: {}", join_names(operations));
    }

    let shell = SystemShell::new(dry_run);
    let report = Runbook::new(&shell, continue_on_error)
        .execute(config, operations)
        .await;

    println!();
    for step in &report.step_results {
        match &step.error {
            None => println!("  ok      {}", step.operation),
            Some(e) => colors::error(&format!("{}: {}", step.operation, e)),
        }
    }

    println!();
    if report.success {
        println!("Run completed successfully");
    } else {
        println!("Run completed with errors");
    }

    println!();
    println!("Results:");
    println!("  Duration: {} ms", report.total_duration_ms);
    println!("  Operations succeeded: {}", report.succeeded);
    println!("  Operations failed: {}", report.failed);

    if !report.success {
        std::process::exit(1);
    }

    Ok(())
}

fn join_names(operations: &[Operation]) -> String {
    operations
        .iter()
        .map(Operation::name)
        .collect::<Vec<_>>()
        .join(", ")
}
