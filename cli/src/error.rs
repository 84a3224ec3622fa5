use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Accelerator(#[from] mempool_accelerator::error::Error),

    #[error("block file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unable to install the signal handler: {0}")]
    Signal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
