use clap::{Parser, Subcommand};
use restaurant_user::proto::user_auth_service_client::UserAuthServiceClient;
use restaurant_user::proto::User;
use tonic::Request;

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "Restaurant user service client", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:50051")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Store {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Look a user up by id or email, optionally checking the password
    Find {
        #[arg(long, default_value_t = 0)]
        id: u64,

        #[arg(short, long, default_value = "")]
        email: String,

        #[arg(short, long, default_value = "")]
        password: String,
    },
}

fn print_user(user: &User) {
    println!("id:         {}", user.id);
    println!("name:       {} {}", user.first_name, user.last_name);
    println!("email:      {}", user.email);
    println!("password:   {}", user.password);
    println!("created_at: {}", user.created_at);
    println!("updated_at: {}", user.updated_at);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut client = UserAuthServiceClient::connect(cli.server).await?;

    let response = match cli.command {
        Commands::Store {
            first_name,
            last_name,
            email,
            password,
        } => {
            client
                .store(Request::new(User {
                    first_name,
                    last_name,
                    email,
                    password,
                    ..User::default()
                }))
                .await
        }
        Commands::Find {
            id,
            email,
            password,
        } => {
            client
                .find_by(Request::new(User {
                    id,
                    email,
                    password,
                    ..User::default()
                }))
                .await
        }
    };

    match response {
        Ok(user) => {
            print_user(&user.into_inner());
            Ok(())
        }
        Err(status) => {
            eprintln!("Request failed ({:?}): {}", status.code(), status.message());
            std::process::exit(1);
        }
    }
}
