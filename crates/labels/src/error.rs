use std::fs;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LabelsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid expression {expression:?}: {reason}")]
    Parse { expression: String, reason: String },

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Invalid query parameter {name}={value:?}")]
    InvalidParam { name: String, value: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),
}

impl LabelsError {
    pub(crate) fn parse(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LabelsError>;

/// Reads a file to a string, mapping a missing file to [`LabelsError::ConfigNotFound`].
pub(crate) fn read_config_file(path: PathBuf) -> Result<String> {
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(contents),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            Err(LabelsError::ConfigNotFound(path))
        }
        Err(error) => Err(LabelsError::Io(error)),
    }
}
