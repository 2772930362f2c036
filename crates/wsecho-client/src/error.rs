use thiserror::Error;

/// Errors produced by the wsecho client library.
#[derive(Debug, Error)]
pub enum EchoError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for EchoError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        EchoError::Transport(e.to_string())
    }
}

pub type EchoResult<T> = Result<T, EchoError>;
