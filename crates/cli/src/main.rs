mod config;
mod convert;
mod error;
mod exit_code;

use clap::Parser;
use colored::Colorize;
use config::ConvertConfig;
use error::CliError;
use exit_code::ExitCode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "graphql-sdl")]
#[command(
    about = "Convert a GraphQL introspection result into description-free SDL",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Path to the introspection JSON file (`{"data": {"__schema": ...}}`)
    #[arg(long, value_name = "FILE")]
    src: Option<PathBuf>,

    /// Path to write the SDL to (overwritten if it exists)
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Keep descriptions in the generated SDL
    #[arg(long)]
    keep_descriptions: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse_from(config::normalize_args(std::env::args_os()));

    init_tracing();

    let quiet = cli.quiet;
    match run(cli) {
        Ok((config, summary)) => {
            if !quiet {
                println!(
                    "{} Wrote SDL to {} ({} bytes)",
                    "✓".green(),
                    config.out.display().to_string().cyan(),
                    summary.bytes_written
                );
                println!(
                    "  {} {:.2}s",
                    "⏱".dimmed(),
                    summary.duration.as_secs_f64()
                );
            }
            ExitCode::Success.exit();
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            let code = err.exit_code();
            tracing::debug!(%code, "Conversion failed");
            code.exit();
        }
    }
}

fn run(cli: Cli) -> Result<(ConvertConfig, convert::Summary), CliError> {
    let config = ConvertConfig::resolve(cli.src, cli.out, cli.keep_descriptions)?;
    let summary = convert::run(&config)?;
    Ok((config, summary))
}

/// Initialize basic tracing, written to stderr and filtered by `RUST_LOG`
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}
