use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// No pandoc executable could be resolved from the constructor argument,
    /// the PANDOC_PATH environment variable, or the platform fallbacks.
    #[error("Pandoc path is not configured")]
    Configuration,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-zero exit from the external converter. The payload is the
    /// process's stderr (or a generic message when stderr was empty) and is
    /// surfaced to the caller verbatim.
    #[error("{0}")]
    ExternalProcess(String),

    /// Anything else that went wrong while launching the process.
    #[error("{0}")]
    Unclassified(String),

    #[error("Invalid style value: {0}")]
    InvalidStyle(String),

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
