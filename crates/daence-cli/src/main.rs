//! Daence command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Generate a ChaCha-Daence key (64 bytes)
//! daence keygen --output chacha.key
//!
//! # Seal and open a file, binding it to a header file
//! daence seal --key chacha.key --ad header.bin --input notes.txt --output notes.sealed
//! daence open --key chacha.key --ad header.bin --input notes.sealed --output notes.txt
//!
//! # Salsa20-Daence (96-byte key)
//! daence --construction salsa20 keygen --output salsa20.key
//! ```
//!
//! Exit status is 2 when a sealed file is forged, corrupted or truncated,
//! and 1 for any other failure.

use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use daence_cli::{CliError, Construction, FileJob, generate_key};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Deterministic authenticated encryption of files
#[derive(Parser, Debug)]
#[command(name = "daence")]
#[command(about = "Deterministic authenticated encryption of files")]
#[command(version)]
struct Cli {
    /// Daence instantiation
    #[arg(long, value_enum, default_value_t, global = true)]
    construction: Construction,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt and authenticate a file
    Seal(FileArgs),
    /// Verify and decrypt a sealed file
    Open(FileArgs),
    /// Write a fresh random key
    Keygen {
        /// Key file to create (must not exist)
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct FileArgs {
    /// Raw key file
    #[arg(short, long)]
    key: PathBuf,

    /// Associated data file (authenticated, not encrypted)
    #[arg(short, long)]
    ad: Option<PathBuf>,

    /// Input file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file, written only on success
    #[arg(short, long)]
    output: PathBuf,
}

impl FileArgs {
    fn into_job(self, construction: Construction) -> FileJob {
        FileJob {
            construction,
            key: self.key,
            associated_data: self.ad,
            input: self.input,
            output: self.output,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(err.exit_code())
        },
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Seal(files) => {
            files.into_job(cli.construction).seal()?;
        },
        Command::Open(files) => {
            files.into_job(cli.construction).open()?;
        },
        Command::Keygen { output } => generate_key(cli.construction, &output)?,
    }
    Ok(())
}
