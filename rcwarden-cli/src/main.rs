//! rcwarden — install and control a script as a native init service.
//!
//! # Usage
//!
//! ```text
//! rcwarden [--config <file>] [--name <name>] [--script <path>] [service flags] <command>
//!
//! rcwarden install | uninstall | start | stop | restart
//! rcwarden status [--json]
//! rcwarden paths
//! ```
//!
//! Exit codes: `0` success, `1` an expected condition (not installed, already
//! running, not running) or a bad command line, `2` anything else.

mod args;
mod commands;
mod defaults;

use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use colored::Colorize;

use args::ServiceArgs;
use commands::{lifecycle::Lifecycle, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "rcwarden",
    version,
    about = "Run scripts as SysV or BSD rc services",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write and register the control script.
    Install,
    /// Stop, de-register and remove the control script, PID file and logs.
    Uninstall,
    /// Start the service through its control script.
    Start,
    /// Stop the service through its control script.
    Stop,
    /// Stop, then start.
    Restart,
    /// Report whether the control script is installed.
    Status(StatusArgs),
    /// Print the control script, PID file and log paths.
    Paths,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };
    init_tracing();

    match dispatch(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{} {err:#}", "ERROR:".red().bold());
            ExitCode::from(2)
        }
    }
}

fn dispatch(cli: Cli) -> Result<u8> {
    let service = cli.service.service()?;
    match cli.command {
        Commands::Install => commands::lifecycle::run(Lifecycle::Install, &service),
        Commands::Uninstall => commands::lifecycle::run(Lifecycle::Uninstall, &service),
        Commands::Start => commands::lifecycle::run(Lifecycle::Start, &service),
        Commands::Stop => commands::lifecycle::run(Lifecycle::Stop, &service),
        Commands::Restart => commands::lifecycle::run(Lifecycle::Restart, &service),
        Commands::Status(args) => args.run(&service),
        Commands::Paths => commands::paths::run(&service),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
}
