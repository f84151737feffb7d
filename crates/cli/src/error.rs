use crate::exit_code::ExitCode;
use graphql_sdl::ConvertError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no schema found in {}", path.display())]
    NoSchema { path: PathBuf },

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) => ExitCode::UsageError,
            Self::Input { .. } | Self::NoSchema { .. } => ExitCode::InputError,
            Self::Convert(ConvertError::Parse(_)) => ExitCode::ParseError,
            Self::Convert(ConvertError::SchemaShape(_)) => ExitCode::SchemaError,
            Self::Convert(ConvertError::Print(_)) => ExitCode::PrintError,
            Self::Output { .. } => ExitCode::IoError,
        }
    }
}
