use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to parse introspection JSON: {0}")]
    Parse(String),

    #[error("Invalid introspection result: {0}")]
    SchemaShape(String),

    #[error("Failed to print schema: {0}")]
    Print(String),
}

impl From<std::fmt::Error> for ConvertError {
    fn from(_: std::fmt::Error) -> Self {
        Self::Print("formatter error".to_string())
    }
}
