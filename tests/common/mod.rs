//! Common test utilities shared across integration tests.

use restaurant_user::proto::user_auth_service_client::UserAuthServiceClient;
use restaurant_user::repository::InMemoryUserRepository;
use restaurant_user::server::{AuthHandler, Server};
use restaurant_user::service::AuthService;
use restaurant_user::ServerSettings;
use tonic::transport::Channel;

/// Initialize test tracing (call once at the beginning of tests).
///
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("restaurant_user=info");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// Starts a server on an ephemeral port backed by `repo` and returns a connected client.
pub async fn start_test_server(
    repo: InMemoryUserRepository,
) -> (UserAuthServiceClient<Channel>, tokio::task::JoinHandle<()>) {
    init_tracing();

    let settings = ServerSettings {
        protocol: "tcp".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let handler = AuthHandler::new(AuthService::new(repo));
    let server = Server::new(&settings, handler)
        .await
        .expect("server should bind");
    let addr = server.local_addr().expect("bound address");

    let handle = tokio::spawn(async move {
        server.listen().await.expect("server should serve");
    });

    let client = UserAuthServiceClient::connect(format!("http://{addr}"))
        .await
        .expect("Failed to connect to server");

    (client, handle)
}
