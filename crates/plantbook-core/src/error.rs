use thiserror::Error;

pub type PlantbookResult<T> = Result<T, PlantbookError>;

#[derive(Debug, Error)]
pub enum PlantbookError {
    #[error("config error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("plant not found: {0}")]
    NotFound(String),

    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
