use thiserror::Error;

/// Errors that abort the daemon. Per the data-plane design, a recoverable
/// network hiccup or a malformed inbound datagram is handled where it is
/// observed and never reaches this type.
#[derive(Error, Debug)]
pub enum TunnelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cipher error: {0}")]
    Cipher(String),

    #[error("device error: {0}")]
    Device(String),

    #[error("socket error: {0}")]
    Socket(String),

    #[error("task error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, TunnelError>;
