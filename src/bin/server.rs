use clap::Parser;
use restaurant_user::repository;
use restaurant_user::server::{AuthHandler, Server};
use restaurant_user::service::AuthService;
use restaurant_user::ServerConfig;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Restaurant user authentication server", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "APP_CONFIG_PATH")]
    config: Option<String>,

    /// Host to bind to (overrides the configuration file)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on (overrides the configuration file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = &args.config {
        std::env::set_var("APP_CONFIG_PATH", path);
    }

    let mut config = ServerConfig::from_env().map_err(|e| {
        error!("Failed to load configuration: {e}");
        format!("Invalid configuration: {e}")
    })?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {e}");
        return Err(format!("Invalid configuration: {e}").into());
    }

    let repository = repository::from_settings(&config.database).await?;

    let handler = AuthHandler::new(AuthService::from_arc(repository));
    let server = Server::new(&config.server, handler).await?;

    server.listen_with_shutdown(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Initiating graceful shutdown (allowing in-flight requests to complete)");
}
