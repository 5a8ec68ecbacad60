use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sidecar format error: {0}")]
    Format(String),

    #[error("Subscription error: {0}")]
    Subscription(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
