//! gRPC server bootstrap.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use tokio::net::{lookup_host, TcpListener};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tracing::{debug, info};

use crate::config::{ServerSettings, Transport};
use crate::proto::user_auth_service_server::UserAuthServiceServer;
use crate::repository::UserRepository;
use crate::{Error, Result};

/// gRPC handlers.
pub mod resource;

pub use resource::AuthHandler;

/// A bound listener with the auth service registered on it.
pub struct Server {
    listener: TcpListener,
    router: Router,
    transport: Transport,
}

impl Server {
    /// Binds the configured address and registers `handler`.
    ///
    /// # Errors
    /// Fails if the protocol is unsupported, the host cannot be resolved for
    /// that protocol, or the socket cannot be bound.
    pub async fn new<R>(settings: &ServerSettings, handler: AuthHandler<R>) -> Result<Self>
    where
        R: UserRepository + ?Sized + 'static,
    {
        let transport = settings.transport()?;
        let listener = bind(transport, &settings.host, settings.port).await?;

        let router =
            tonic::transport::Server::builder().add_service(UserAuthServiceServer::new(handler));

        Ok(Self {
            listener,
            router,
            transport,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves incoming calls until the transport fails.
    pub async fn listen(self) -> Result<()> {
        self.listen_with_shutdown(std::future::pending()).await
    }

    /// Serves incoming calls until `signal` resolves or the transport fails.
    pub async fn listen_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let port = self.local_addr().map(|addr| addr.port()).unwrap_or_default();
        info!("{} server started listening on port {}", self.transport, port);

        self.router
            .serve_with_incoming_shutdown(TcpListenerStream::new(self.listener), signal)
            .await?;

        Ok(())
    }
}

async fn resolve(transport: Transport, host: &str, port: u16) -> Result<SocketAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        let addr = SocketAddr::new(ip, port);
        if transport.accepts(&addr) {
            return Ok(addr);
        }
        return Err(Error::InvalidAddress(format!(
            "{addr} is not a {transport} address"
        )));
    }

    let target = format!("{host}:{port}");
    let mut candidates = lookup_host(&target)
        .await
        .map_err(|e| Error::InvalidAddress(format!("{target}: {e}")))?;

    candidates
        .find(|addr| transport.accepts(addr))
        .ok_or_else(|| Error::InvalidAddress(format!("{target} has no {transport} address")))
}

async fn bind(transport: Transport, host: &str, port: u16) -> Result<TcpListener> {
    let addr = resolve(transport, host, port).await?;
    debug!(%addr, "binding listener");

    TcpListener::bind(addr).await.map_err(|source| Error::Bind {
        addr: addr.to_string(),
        source,
    })
}
