//! Conversion settings resolved once from the command line.

use crate::error::CliError;
use std::ffi::OsString;
use std::path::PathBuf;

/// Everything a conversion run needs, passed explicitly into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Introspection JSON to read
    pub src: PathBuf,
    /// SDL file to create or overwrite
    pub out: PathBuf,
    /// Skip description stripping
    pub keep_descriptions: bool,
}

impl ConvertConfig {
    /// Validates the parsed arguments. Both paths are required.
    pub fn resolve(
        src: Option<PathBuf>,
        out: Option<PathBuf>,
        keep_descriptions: bool,
    ) -> Result<Self, CliError> {
        let src = src.ok_or_else(|| CliError::Usage("must provide src path".to_string()))?;
        let out = out.ok_or_else(|| CliError::Usage("must provide out path".to_string()))?;
        tracing::debug!(src = %src.display(), out = %out.display(), keep_descriptions, "Resolved config");
        Ok(Self {
            src,
            out,
            keep_descriptions,
        })
    }
}

/// Rewrites a bare `src` token into `--src`, so `graphql-sdl src schema.json`
/// keeps working for scripts written against the older argument style.
///
/// A `src` token that is the value of `--src` or `--out` is left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized: Vec<OsString> = Vec::new();
    for arg in args {
        let takes_value = normalized
            .last()
            .is_some_and(|prev| prev == "--src" || prev == "--out");
        if arg == "src" && !takes_value && !normalized.is_empty() {
            normalized.push(OsString::from("--src"));
        } else {
            normalized.push(arg);
        }
    }
    normalized
}
