//! Configuration management for the bot shell.
//!
//! This module handles loading environment settings and the credentials file.

use crate::error::{Result, ShellError};
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

/// Literal prefix recognized at the start of a message for command parsing.
pub const COMMAND_PREFIX: &str = "pb!";

/// Presence text announced once the gateway is ready.
pub const PRESENCE_TEXT: &str = "pb!help for help!";

const DEFAULT_CREDENTIALS_PATH: &str = "resources/auth";
const DEFAULT_STATUS_BIND_ADDRESS: &str = "0.0.0.0:1441";
const DEFAULT_STATS_API_BASE_URL: &str = "https://bots.discord.pw";
const DEFAULT_LOG_PATH: &str = "resources/discord.log";

/// Configuration for the application, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON credentials file
    pub credentials_path: String,
    /// Path to SQLite database file
    pub db_path: String,
    /// Address the status service binds to (host:port)
    pub status_bind_address: SocketAddr,
    /// Base URL of the external bot-list stats service
    pub stats_api_base_url: String,
    /// Path of the append-only log file
    pub log_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This will attempt to load a .env file if present using dotenv,
    /// then read the optional overrides. Every setting has a default.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is present but invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rpgbot::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load configuration");
    /// println!("Status service: {}", config.status_bind_address);
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors - it's optional)
        dotenv::dotenv().ok();

        let credentials_path = env::var("CREDENTIALS_PATH")
            .unwrap_or_else(|_| DEFAULT_CREDENTIALS_PATH.to_string());

        let db_path = Self::get_db_path()?;

        let status_bind_address = Self::parse_bind_address(
            &env::var("STATUS_BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_STATUS_BIND_ADDRESS.to_string()),
        )?;

        let stats_api_base_url = env::var("STATS_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_STATS_API_BASE_URL.to_string());
        Self::validate_base_url(&stats_api_base_url)?;

        let log_path = env::var("LOG_PATH").unwrap_or_else(|_| DEFAULT_LOG_PATH.to_string());

        Ok(Self {
            credentials_path,
            db_path,
            status_bind_address,
            stats_api_base_url: stats_api_base_url.trim_end_matches('/').to_string(),
            log_path,
        })
    }

    /// Get the database path from environment or use default.
    fn get_db_path() -> Result<String> {
        match env::var("DB_PATH") {
            Ok(path) => Ok(path),
            Err(_) => {
                let mut path = env::current_dir().map_err(|e| {
                    ShellError::Config(format!("Failed to determine current directory: {}", e))
                })?;

                path.push("data");
                path.push("rpgbot.db");

                path.into_os_string().into_string().map_err(|os_str| {
                    ShellError::Config(format!(
                        "Database path contains invalid Unicode: {:?}",
                        os_str
                    ))
                })
            }
        }
    }

    /// Parse the status service bind address.
    fn parse_bind_address(address: &str) -> Result<SocketAddr> {
        address.parse::<SocketAddr>().map_err(|_| {
            ShellError::Config(format!(
                "Invalid STATUS_BIND_ADDRESS: '{}'. Expected 'ip:port' format.",
                address
            ))
        })
    }

    /// Validate the stats API base URL using proper URL parsing.
    fn validate_base_url(url_str: &str) -> Result<()> {
        use url::Url;

        let parsed_url = Url::parse(url_str).map_err(|e| {
            ShellError::Config(format!("Invalid STATS_API_BASE_URL '{}': {}", url_str, e))
        })?;

        let scheme = parsed_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ShellError::Config(format!(
                "STATS_API_BASE_URL must use http:// or https:// scheme, got: '{}'",
                scheme
            )));
        }

        if parsed_url.host_str().is_none() {
            return Err(ShellError::Config(format!(
                "STATS_API_BASE_URL must contain a valid host: '{}'",
                url_str
            )));
        }

        Ok(())
    }
}

/// Secrets read from the credentials file.
///
/// Loaded once at startup and never modified afterwards.
#[derive(Clone)]
pub struct Credentials {
    /// Token used to log the client in
    pub client_token: String,
    /// Bearer token for the external stats service
    pub stats_api_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_token", &"<redacted>")
            .field("stats_api_token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Load credentials from a JSON array of strings.
    ///
    /// The first entry is the client token and the second the stats-service
    /// token. Additional entries are ignored.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the credentials file
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Config` if the file is missing, unreadable, is not
    /// a JSON array of strings, or holds fewer than two entries.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ShellError::Config(format!(
                "Failed to read credentials file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Result<Self> {
        let entries: Vec<String> = serde_json::from_str(raw).map_err(|e| {
            ShellError::Config(format!(
                "Credentials file must be a JSON array of strings: {}",
                e
            ))
        })?;

        let mut entries = entries.into_iter();
        match (entries.next(), entries.next()) {
            (Some(client_token), Some(stats_api_token)) => Ok(Self {
                client_token,
                stats_api_token,
            }),
            _ => Err(ShellError::Config(
                "Credentials file must contain at least two entries (client token, stats token)"
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_credentials(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write credentials");
        file
    }

    #[test]
    fn test_load_credentials() {
        let file = write_credentials(r#"["client-token", "stats-token"]"#);

        let credentials = Credentials::load(file.path()).unwrap();
        assert_eq!(credentials.client_token, "client-token");
        assert_eq!(credentials.stats_api_token, "stats-token");
    }

    #[test]
    fn test_load_credentials_ignores_extra_entries() {
        let file = write_credentials(r#"["a", "b", "c"]"#);

        let credentials = Credentials::load(file.path()).unwrap();
        assert_eq!(credentials.client_token, "a");
        assert_eq!(credentials.stats_api_token, "b");
    }

    #[test]
    fn test_load_credentials_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Credentials::load(dir.path().join("auth"));
        assert!(matches!(result, Err(ShellError::Config(_))));
    }

    #[test]
    fn test_load_credentials_too_few_entries() {
        let file = write_credentials(r#"["only-one"]"#);
        assert!(matches!(
            Credentials::load(file.path()),
            Err(ShellError::Config(_))
        ));

        let file = write_credentials("[]");
        assert!(Credentials::load(file.path()).is_err());
    }

    #[test]
    fn test_load_credentials_malformed() {
        assert!(Credentials::parse("not json").is_err());
        assert!(Credentials::parse(r#"{"token": "x"}"#).is_err());
        assert!(Credentials::parse(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials::parse(r#"["secret-a", "secret-b"]"#).unwrap();
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret-a"));
        assert!(!debug.contains("secret-b"));
    }

    #[test]
    fn test_parse_bind_address() {
        assert!(Config::parse_bind_address("0.0.0.0:1441").is_ok());
        assert!(Config::parse_bind_address("127.0.0.1:8080").is_ok());

        assert!(Config::parse_bind_address("localhost").is_err());
        assert!(Config::parse_bind_address("0.0.0.0:99999").is_err());
    }

    #[test]
    fn test_validate_base_url() {
        assert!(Config::validate_base_url("https://bots.discord.pw").is_ok());
        assert!(Config::validate_base_url("http://127.0.0.1:1234").is_ok());

        assert!(Config::validate_base_url("ftp://bots.discord.pw").is_err());
        assert!(Config::validate_base_url("not a url").is_err());
    }

    #[test]
    fn test_get_db_path_with_env_var() {
        // Save original value (if any)
        let original_value = env::var("DB_PATH").ok();

        let custom_path = "/custom/path/to/rpgbot.db";
        env::set_var("DB_PATH", custom_path);

        let result = Config::get_db_path();
        assert_eq!(result.unwrap(), custom_path);

        // Restore original value
        match original_value {
            Some(val) => env::set_var("DB_PATH", val),
            None => env::remove_var("DB_PATH"),
        }
    }
}
