use clap::{ArgAction, Parser, Subcommand};
use ruleguard::RuleguardConfig;
use ruleguard::commands::{self, check::CheckArgs, generate::GenerateArgs, validate::ValidateArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Check validation-rule schemas and generate validators from them.
#[derive(Parser)]
#[command(name = "ruleguard", version, about)]
struct Cli {
    /// Debug logging; repeat for trace. Overrides RUST_LOG
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Project root holding .ruleguard/config.toml (default: current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a schema's rules without generating anything
    Check(CheckArgs),
    /// Generate validation routines
    Generate(GenerateArgs),
    /// Validate a JSON message instance against a schema
    Validate(ValidateArgs),
    /// List available backends
    Backends,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reset SIGPIPE to default behavior so piping to `head` etc. doesn't panic.
#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: resets the SIGPIPE disposition to its default; touches no memory.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

fn main() {
    reset_sigpipe();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = cli
        .root
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let config = RuleguardConfig::load(&root);
    tracing::debug!(?config, "loaded config");

    let result = match cli.command {
        Command::Check(args) => commands::check::run(args),
        Command::Generate(args) => commands::generate::run(args, &config),
        Command::Validate(args) => commands::validate::run(args),
        Command::Backends => commands::backends::run(),
    };
    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
