use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Service configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listener settings.
    pub server: ServerSettings,
    /// Backing datastore settings.
    pub database: DatabaseSettings,
}

/// Listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Transport protocol name (`tcp`, `tcp4` or `tcp6`).
    pub protocol: String,
    /// Hostname or IP address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl ServerSettings {
    /// Parses the configured protocol name.
    pub fn transport(&self) -> Result<Transport, Error> {
        self.protocol.parse()
    }
}

/// Datastore settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// MySQL connection URL. Users are kept in memory when unset.
    pub url: Option<String>,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

/// Stream transports the server can listen on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    /// TCP over IPv4 or IPv6.
    Tcp,
    /// TCP over IPv4 only.
    Tcp4,
    /// TCP over IPv6 only.
    Tcp6,
}

impl Transport {
    /// Returns true if this transport may listen on `addr`.
    pub fn accepts(self, addr: &SocketAddr) -> bool {
        match self {
            Self::Tcp => true,
            Self::Tcp4 => addr.is_ipv4(),
            Self::Tcp6 => addr.is_ipv6(),
        }
    }
}

impl FromStr for Transport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "tcp4" => Ok(Self::Tcp4),
            "tcp6" => Ok(Self::Tcp6),
            _ => Err(Error::UnsupportedProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tcp => "tcp",
            Self::Tcp4 => "tcp4",
            Self::Tcp6 => "tcp6",
        };
        f.write_str(name)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                protocol: "tcp".to_string(),
                host: "127.0.0.1".to_string(),
                port: 50051,
            },
            database: DatabaseSettings {
                url: None,
                max_connections: 10,
            },
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `.env`, a TOML file and environment variables.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables prefixed with `APP_`, nested with `__`
    ///    (e.g. `APP_SERVER__PORT=8080`, `APP_DATABASE__URL=mysql://...`)
    /// 2. TOML file at `APP_CONFIG_PATH` (default `config/server.toml`), skipped if missing
    /// 3. Built-in defaults
    ///
    /// A `.env` file in the current directory or one of its parents is loaded
    /// into the environment first, if present.
    ///
    /// # Errors
    /// Returns an error if a source is malformed or a value has the wrong type.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> figment::error::Result<Self> {
        use figment::providers::{Env, Format, Serialized, Toml};
        use figment::Figment;

        let _ = dotenvy::dotenv();

        let config_path =
            std::env::var("APP_CONFIG_PATH").unwrap_or_else(|_| "config/server.toml".to_string());

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("APP_").ignore(&["config_path"]).split("__"))
            .extract()
    }

    /// Validates the configuration before the server is started.
    ///
    /// # Errors
    /// Returns a message describing the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.host.trim().is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.server.port == 0 {
            return Err("Server port cannot be zero".to_string());
        }

        self.server.transport().map_err(|e| e.to_string())?;

        if let Some(url) = &self.database.url {
            if !url.starts_with("mysql://") {
                return Err("Database url must use the mysql:// scheme".to_string());
            }
        }

        if self.database.max_connections == 0 {
            return Err("Database max_connections cannot be zero".to_string());
        }

        Ok(())
    }
}
