//! `rcwarden-supervise` — run a script as a daemon with a PID file.
//!
//! # Usage
//!
//! ```text
//! rcwarden-supervise -n <name> -f <script> -p <pidfile> [-d <cwd>] [-o <stdout>]
//!                    [-e <stderr>] [-u <user>] [-g <group>] [-t <ms>] start|stop|status
//! ```
//!
//! Prints exactly one `<name>: OK: ...` or `<name>: ERROR: ...` line on stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use rcwarden_supervisor::{run, Action, Options};

#[derive(Parser, Debug)]
#[command(
    name = "rcwarden-supervise",
    version,
    about = "Start, stop and query a daemonized script",
    long_about = None,
)]
struct Cli {
    /// Name used in status lines.
    #[arg(short = 'n', long)]
    name: String,

    /// Script to run as the daemon.
    #[arg(short = 'f', long)]
    file: PathBuf,

    /// PID file.
    #[arg(short = 'p', long)]
    pidfile: PathBuf,

    /// Working directory of the daemon.
    #[arg(short = 'd', long, default_value = "/")]
    cwd: PathBuf,

    /// Append stdout to this file.
    #[arg(short = 'o', long, default_value = "/dev/null")]
    stdout: PathBuf,

    /// Append stderr to this file.
    #[arg(short = 'e', long, default_value = "/dev/null")]
    stderr: PathBuf,

    /// User to run as; `-` keeps the current one.
    #[arg(short = 'u', long, default_value = "-")]
    user: String,

    /// Group to run as; `-` keeps the current one.
    #[arg(short = 'g', long, default_value = "-")]
    group: String,

    /// Stop timeout in milliseconds.
    #[arg(short = 't', long, default_value_t = 2000)]
    timeout: u64,

    #[arg(value_enum)]
    action: Action,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let options = Options {
        name: cli.name,
        file: cli.file,
        pidfile: cli.pidfile,
        cwd: cli.cwd,
        stdout: cli.stdout,
        stderr: cli.stderr,
        user: cli.user,
        group: cli.group,
        timeout: Duration::from_millis(cli.timeout),
    };

    match run(&options, cli.action) {
        Ok(outcome) => {
            println!("{}", outcome.line(&options.name));
            ExitCode::from(outcome.exit_code())
        }
        Err(err) => {
            println!("{}: ERROR: {err}", options.name);
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    // stderr is read back as the failure detail of a control-script action.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
}
