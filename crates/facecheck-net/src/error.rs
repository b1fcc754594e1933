use facecheck_core::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
    #[error("not a supported image: {0}")]
    Image(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NetError> for BackendError {
    fn from(err: NetError) -> Self {
        match err {
            NetError::Http { status, body } => BackendError::Http { status, body },
            NetError::Decode(msg) => BackendError::Decode(msg),
            other => BackendError::Network(other.to_string()),
        }
    }
}
