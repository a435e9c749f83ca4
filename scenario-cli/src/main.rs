//! # Scenario CLI
//!
//! Encode scenario JSON into share tokens and decode tokens back.
//!
//! ## Usage
//!
//! ```bash
//! # Encode a scenario file and print a share link
//! scenario-cli encode --input scenario.json --url https://calc.example.com/
//!
//! # Decode a token or a full share link
//! scenario-cli decode 'https://calc.example.com/?scenario=N4Ig...'
//! ```

use clap::{Parser, Subcommand};
use scenario_codec::persistence::{share_url, token_from_url};
use scenario_codec::{CodecConfig, CodecError, CodecMetrics, DecodeError, Scenario, ScenarioCodec};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Scenario token encoder/decoder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Codec settings file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Query parameter carrying the token
    #[arg(long, global = true, default_value = scenario_codec::QUERY_PARAM)]
    param: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode scenario JSON into a token
    Encode {
        /// JSON file to read (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print a share link on this base URL instead of the bare token
        #[arg(short, long)]
        url: Option<String>,

        /// Print size statistics to stderr
        #[arg(short, long)]
        stats: bool,
    },

    /// Decode a token or share link into scenario JSON
    Decode {
        /// Token, or a URL carrying one
        token: String,

        /// Print the JSON on a single line
        #[arg(long)]
        compact: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scenario: {0}")]
    Scenario(DecodeError),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("could not decode token: {0}")]
    Decode(#[from] DecodeError),

    #[error("URL has no '{0}' parameter")]
    MissingToken(String),
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("scenario-cli v{}", env!("CARGO_PKG_VERSION"));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => CodecConfig::from_file(path)?,
        None => CodecConfig::default(),
    };
    let codec = ScenarioCodec::with_config(config)?;

    match args.command {
        Command::Encode { input, url, stats } => {
            let json = read_input(input.as_ref())?;
            let scenario = Scenario::from_json(&json).map_err(CliError::Scenario)?;
            let (token, report) = codec.encode_with_report(&scenario);

            match url {
                Some(base) => {
                    let link = share_url(&Url::parse(&base)?, &args.param, &token);
                    println!("{}", link);
                }
                None => println!("{}", token),
            }

            if stats {
                let mut metrics = CodecMetrics::new();
                metrics.record_encode(&report);
                eprintln!("{}", metrics.report());
                for entry in &report.custom_words {
                    eprintln!(
                        "  {} -> {} (x{}, saves {})",
                        entry.word, entry.symbol, entry.frequency, entry.savings
                    );
                }
            }
        }
        Command::Decode { token, compact } => {
            let token = extract_token(&token, &args.param)?;
            debug!("decoding {} character token", token.len());
            let scenario = codec.decode(&token)?;
            let value = serde_json::Value::from(scenario);
            if compact {
                println!("{}", value);
            } else {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Bare tokens pass through; anything with a scheme is read as a share link.
fn extract_token(input: &str, param: &str) -> Result<String, CliError> {
    let input = input.trim();
    if !input.contains("://") {
        return Ok(input.to_string());
    }
    let url = Url::parse(input)?;
    token_from_url(&url, param).ok_or_else(|| CliError::MissingToken(param.to_string()))
}
