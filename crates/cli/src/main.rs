//! Conformance harness CLI.
//!
//! This binary runs the reference echo buffer through the harness. It performs:
//! 1. **Run:** Load a JSON configuration (or the defaults), apply overrides and injected faults, run to a verdict.
//! 2. **Config:** Print the default configuration as JSON, as a starting point for a config file.
//!
//! Exit status is 0 on PASS, 1 when the scoreboard recorded findings and 2 on a harness error.

use std::path::PathBuf;
use std::process;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use dutcheck_core::config::ModelKind;
use dutcheck_core::dut::{EchoBuffer, Fault, FaultyDut};
use dutcheck_core::stats::STATS_SECTIONS;
use dutcheck_core::{HarnessConfig, Result, TestBench};

/// Exit status for harness errors (bad config, contract violations).
const EXIT_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "dutcheck",
    author,
    version,
    about = "Cycle-driven conformance harness for request/response devices",
    long_about = "Drive the reference echo buffer with seeded stimulus and check every response against an expected-value model.\n\nExamples:\n  dutcheck run --seed 7 --count 1000\n  dutcheck run --config bench.json --drop 3 --corrupt 5:0xff --json\n  dutcheck config > bench.json"
)]
struct Cli {
    /// Raise log verbosity (`-v` debug, `-vv` trace); `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one stimulus profile against the echo buffer.
    Run(RunArgs),

    /// Print the default configuration as JSON.
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON configuration file; defaults are used for anything it omits.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the stimulus seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of transactions.
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Drop the device's Nth response (zero-based; repeatable).
    #[arg(long, value_name = "N")]
    drop: Vec<u64>,

    /// XOR the device's Nth response with a mask (repeatable).
    #[arg(long, value_name = "N:MASK", value_parser = parse_corrupt)]
    corrupt: Vec<Fault>,

    /// Assert an invented response on a clock edge (repeatable).
    #[arg(long, value_name = "EDGE:DATA", value_parser = parse_spurious)]
    spurious: Vec<Fault>,

    /// Check against the identity model instead of the circular-buffer model.
    #[arg(long)]
    identity: bool,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Statistics sections to print (summary, stimulus, findings); all if omitted.
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied())
    )]
    stats: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Config => cmd_config(),
    };
    process::exit(code.unwrap_or_else(|err| {
        error!(%err, "harness error");
        eprintln!("error: {err}");
        EXIT_ERROR
    }));
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the configuration, runs the bench and prints the report.
///
/// Returns the report's exit code (0 pass, 1 findings).
fn cmd_run(args: RunArgs) -> Result<i32> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::from_path(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.stimulus.seed = seed;
    }
    if let Some(count) = args.count {
        config.stimulus.count = count;
    }
    if args.identity {
        config.scoreboard.model = ModelKind::IdentityEcho;
    }

    let faults = args
        .drop
        .iter()
        .map(|&response| Fault::Drop { response })
        .chain(args.corrupt.iter().copied())
        .chain(args.spurious.iter().copied());
    let dut = FaultyDut::new(EchoBuffer::new(config.dut.depth)).with_faults(faults);

    let report = TestBench::new(config, dut)?.run()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
        if args.stats.is_empty() {
            report.stats.print();
        } else {
            report.stats.print_sections(&args.stats);
        }
    }
    Ok(report.exit_code())
}

fn cmd_config() -> Result<i32> {
    println!("{}", serde_json::to_string_pretty(&HarnessConfig::default())?);
    Ok(0)
}

/// Parses a decimal or `0x`-prefixed hexadecimal integer.
fn parse_number(s: &str) -> std::result::Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number `{s}`: {e}"))
}

fn parse_u32(s: &str) -> std::result::Result<u32, String> {
    let value = parse_number(s)?;
    u32::try_from(value).map_err(|_| format!("`{s}` does not fit in 32 bits"))
}

fn split_pair(s: &str) -> std::result::Result<(&str, &str), String> {
    s.split_once(':')
        .ok_or_else(|| format!("expected `A:B`, got `{s}`"))
}

fn parse_corrupt(s: &str) -> std::result::Result<Fault, String> {
    let (response, xor) = split_pair(s)?;
    Ok(Fault::Corrupt {
        response: parse_number(response)?,
        xor: parse_u32(xor)?,
    })
}

fn parse_spurious(s: &str) -> std::result::Result<Fault, String> {
    let (edge, data) = split_pair(s)?;
    Ok(Fault::Spurious {
        edge: parse_number(edge)?,
        data: parse_u32(data)?,
    })
}
