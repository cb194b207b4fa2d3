use thiserror::Error;

/// The main error type for Rigger operations
#[derive(Debug, Error)]
pub enum RiggerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot find {0}")]
    NotFound(String),

    #[error("cannot find configuration for '{0}'")]
    ProjectNotFound(String),

    #[error("cannot parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("command error: {0}")]
    Command(String),
}

/// Result type alias for Rigger operations
pub type RiggerResult<T> = Result<T, RiggerError>;
