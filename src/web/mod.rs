use derive_more::Display;

/// HTTP exposition of the metrics registry
pub mod server;

pub use server::MetricsServer;

#[derive(Debug, Display)]
pub enum WebError {
    #[display(fmt = "failed to bind {}: {}", address, reason)]
    Bind { address: String, reason: String },
    Io(std::io::Error),
    Encode(prometheus::Error),
    InvalidHeader,
}

impl From<std::io::Error> for WebError {
    fn from(err: std::io::Error) -> Self {
        WebError::Io(err)
    }
}

impl From<prometheus::Error> for WebError {
    fn from(err: prometheus::Error) -> Self {
        WebError::Encode(err)
    }
}

impl std::error::Error for WebError {}

pub type Result<T> = std::result::Result<T, WebError>;
