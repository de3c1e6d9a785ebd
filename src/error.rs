use thiserror::Error;

#[derive(Error, Debug)]
pub enum CpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Shape mismatch: {0}")]
    Shape(String),

    #[error("Overflow: {0}")]
    Overflow(String),

    #[error("No convergence after {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("Plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, CpError>;

impl CpError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CpError::InvalidParameter(message.into())
    }
}
