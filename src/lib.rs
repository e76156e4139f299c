//! # restaurant-user
//!
//! User authentication and storage service for the restaurant ordering
//! platform, exposed over gRPC.
//!
//! Requests flow through three layers:
//!
//! - [`server`] binds the listener and translates protobuf messages,
//! - [`service`] digests passwords and maps repository failures,
//! - [`repository`] persists records in MySQL or in memory.
//!
//! ## Example
//!
//! ```rust,no_run
//! use restaurant_user::repository::InMemoryUserRepository;
//! use restaurant_user::server::{AuthHandler, Server};
//! use restaurant_user::service::AuthService;
//! use restaurant_user::ServerConfig;
//!
//! # async fn run() -> restaurant_user::Result<()> {
//! let config = ServerConfig::default();
//! let service = AuthService::new(InMemoryUserRepository::new());
//! let server = Server::new(&config.server, AuthHandler::new(service)).await?;
//! server.listen().await
//! # }
//! ```

/// Listener and datastore configuration.
pub mod config;

/// Password digests.
pub mod encryption;

/// Error types.
pub mod error;

/// Persistence layer.
pub mod repository;

/// gRPC server bootstrap and handlers.
pub mod server;

/// Service layer.
pub mod service;

/// Generated protobuf types and gRPC stubs.
pub mod proto {
    tonic::include_proto!("user.auth");
}

pub use config::{DatabaseSettings, ServerConfig, ServerSettings, Transport};
pub use encryption::digest;
pub use error::{Error, Result};
