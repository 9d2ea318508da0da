#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use simplay::{LogFormat, format_clock};

use crate::error::Result;
use crate::fixture;
use crate::play::{PlayArgs, load_sequence, run_play};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "simplay-demo",
    about = "Headless player for agent UI test sessions",
    version
)]
pub struct Cli {
    /// Log line format (filter via SIMPLAY_LOG).
    #[arg(long = "log-format", value_enum, global = true, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play a sequence on a virtual clock and print sampled frames.
    Play(PlayArgs),

    /// Validate a sequence JSON file.
    Validate {
        /// Sequence file to check.
        file: PathBuf,
    },

    /// Print the built-in demo sequence as JSON.
    #[command(name = "demo-sequence")]
    DemoSequence,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    simplay::init_logging(cli.log_format.into());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Play(args) => {
            run_play(&args, out)?;
            Ok(())
        }
        Commands::Validate { file } => {
            let sequence = load_sequence(&file)?;
            writeln!(
                out,
                "ok: {} actions, total {}",
                sequence.len(),
                format_clock(sequence.total_duration_ms())
            )?;
            Ok(())
        }
        Commands::DemoSequence => {
            let sequence = fixture::login_flow()?;
            writeln!(out, "{}", serde_json::to_string_pretty(&sequence)?)?;
            Ok(())
        }
    }
}
