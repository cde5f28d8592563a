use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_ENV: &str = "BURROW_ENV";
pub const LISTEN_ADDR_ENV: &str = "BURROW_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "BURROW_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "BURROW_STORAGE_BACKEND";
pub const STORAGE_PATH_ENV: &str = "BURROW_STORAGE_PATH";
pub const ALIAS_LENGTH_ENV: &str = "BURROW_ALIAS_LENGTH";
pub const ALIAS_MAX_ATTEMPTS_ENV: &str = "BURROW_ALIAS_MAX_ATTEMPTS";
pub const REQUEST_TIMEOUT_ENV: &str = "BURROW_REQUEST_TIMEOUT_SECS";
pub const SHUTDOWN_TIMEOUT_ENV: &str = "BURROW_SHUTDOWN_TIMEOUT_SECS";
pub const ADMIN_USER_ENV: &str = "BURROW_ADMIN_USER";
pub const ADMIN_PASSWORD_ENV: &str = "BURROW_ADMIN_PASSWORD";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8081";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_ALIAS_LENGTH: &str = "6";
pub const DEFAULT_ALIAS_MAX_ATTEMPTS: &str = "5";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 4;
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 6;

/// Deployment environment; selects the log format and verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    #[value(name = "local")]
    Local,
    #[value(name = "dev")]
    Dev,
    #[value(name = "prod")]
    Prod,
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "burrow", about = "Short alias to URL redirect service")]
pub struct Cli {
    #[arg(long, env = ENV_ENV, value_enum, default_value_t = Environment::Local)]
    pub env: Environment,

    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Base URL used to render full short links in responses.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    /// SQLite database file; created if missing.
    #[arg(long, env = STORAGE_PATH_ENV, required_if_eq("storage", "sqlite"))]
    pub storage_path: Option<PathBuf>,

    /// Length of generated aliases.
    #[arg(long, env = ALIAS_LENGTH_ENV, default_value = DEFAULT_ALIAS_LENGTH)]
    pub alias_length: NonZeroUsize,

    /// Generated aliases to try before reporting failure.
    #[arg(long, env = ALIAS_MAX_ATTEMPTS_ENV, default_value = DEFAULT_ALIAS_MAX_ATTEMPTS)]
    pub alias_max_attempts: NonZeroUsize,

    #[arg(long, env = REQUEST_TIMEOUT_ENV, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Upper bound for draining connections and for closing storage, each.
    #[arg(long, env = SHUTDOWN_TIMEOUT_ENV, default_value_t = DEFAULT_SHUTDOWN_TIMEOUT_SECS)]
    pub shutdown_timeout_secs: u64,

    #[arg(long, env = ADMIN_USER_ENV)]
    pub admin_user: String,

    #[arg(long, env = ADMIN_PASSWORD_ENV, hide_env_values = true)]
    pub admin_password: String,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
