use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl AssistError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        AssistError::Validation(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, AssistError>;
