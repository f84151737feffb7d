//! The conversion command: read introspection JSON, write SDL.

use crate::config::ConvertConfig;
use crate::error::CliError;
use graphql_sdl::{convert_with, ConvertOptions};
use std::path::Path;
use std::time::{Duration, Instant};

/// What a successful run produced.
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub bytes_written: usize,
    pub duration: Duration,
}

/// Runs the full pipeline. The output file is only touched after every stage
/// has succeeded.
#[tracing::instrument(skip(config), fields(src = %config.src.display(), out = %config.out.display()))]
pub fn run(config: &ConvertConfig) -> Result<Summary, CliError> {
    let start_time = Instant::now();

    let json = read_input(&config.src)?;
    let options = ConvertOptions {
        strip_descriptions: !config.keep_descriptions,
    };
    let mut sdl = convert_with(&json, &options)?;

    // Ensure trailing newline for SDL
    if !sdl.ends_with('\n') {
        sdl.push('\n');
    }

    std::fs::write(&config.out, &sdl).map_err(|source| CliError::Output {
        path: config.out.clone(),
        source,
    })?;
    tracing::info!(bytes = sdl.len(), "SDL written");

    Ok(Summary {
        bytes_written: sdl.len(),
        duration: start_time.elapsed(),
    })
}

fn read_input(path: &Path) -> Result<String, CliError> {
    tracing::debug!("Reading introspection file");
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Err(CliError::NoSchema {
            path: path.to_path_buf(),
        });
    }
    Ok(contents)
}
