//! Exit codes for the SDL CLI.
//!
//! Each failure category has its own code so build scripts can tell a bad
//! invocation from a bad schema.

/// Exit codes used by the CLI.
///
/// These follow standard Unix conventions where 0 indicates success
/// and non-zero values indicate different types of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - SDL written
    Success = 0,
    /// Missing or invalid command-line arguments
    UsageError = 2,
    /// Input file missing, unreadable or empty
    InputError = 3,
    /// Input is not valid JSON
    ParseError = 4,
    /// JSON is not a usable introspection result
    SchemaError = 5,
    /// Schema could not be printed as SDL
    PrintError = 6,
    /// Output file could not be written
    IoError = 7,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::UsageError => write!(f, "usage error"),
            Self::InputError => write!(f, "input error"),
            Self::ParseError => write!(f, "parse error"),
            Self::SchemaError => write!(f, "schema shape error"),
            Self::PrintError => write!(f, "print error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
