//! Error types for the user service bootstrap.

use crate::repository::RepositoryError;

/// Errors raised while starting or running the gRPC server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The listener could not be bound.
    #[error("failed to listen to {addr}: {source}")]
    Bind {
        /// Address the listener tried to bind.
        addr: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configured transport is not one the server can listen on.
    #[error("unsupported transport protocol: {0}")]
    UnsupportedProtocol(String),

    /// Host and port do not form a usable socket address.
    #[error("invalid listen address: {0}")]
    InvalidAddress(String),

    /// The tonic transport failed while serving.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The backing repository could not be prepared.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Convenience alias for results produced by the bootstrap.
pub type Result<T> = std::result::Result<T, Error>;
