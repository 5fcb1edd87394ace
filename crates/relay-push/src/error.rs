use thiserror::Error;

pub type Result<T> = std::result::Result<T, PushError>;

#[derive(Error, Debug)]
pub enum PushError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("LINE push request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
