use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("MALFORMED_RECORD: {0}")]
    Malformed(String),
    #[error("CONFIG_INVALID: {0}")]
    Config(String),
    #[error("FETCH_FAILED: {0}")]
    Fetch(String),
    #[error("IO_FAILURE: {0}")]
    Io(String),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Config(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
