//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use habesha_core::Role;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub sessions: SessionsConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Feedback database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("habesha").join("feedback.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./habesha_feedback.db".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound for an explicit `limit` on `GET /feedback`
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_request_timeout() -> u64 {
    30
}

fn default_list_limit() -> usize {
    500
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:8084".to_string(),
                "http://127.0.0.1:8084".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
            list_limit: default_list_limit(),
        }
    }
}

/// Which backend answers `POST /chat/message`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatProvider {
    /// Built-in keyword FAQ responder
    #[default]
    Faq,
    /// Google Gemini `generateContent`
    Gemini,
}

impl std::str::FromStr for ChatProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "faq" => Ok(ChatProvider::Faq),
            "gemini" => Ok(ChatProvider::Gemini),
            other => Err(format!("Unknown chat provider: {}", other)),
        }
    }
}

/// Chat backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub provider: ChatProvider,

    #[serde(default = "default_gemini_url")]
    pub gemini_url: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default)]
    pub gemini_api_key: Option<String>,

    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_chat_timeout() -> u64 {
    20
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: ChatProvider::default(),
            gemini_url: default_gemini_url(),
            gemini_model: default_gemini_model(),
            gemini_api_key: None,
            timeout_secs: default_chat_timeout(),
        }
    }
}

/// Contextual session token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsConfig {
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u32,

    #[serde(default = "default_max_ttl")]
    pub max_ttl_hours: u32,
}

fn default_token_ttl() -> u32 {
    72
}

fn default_max_ttl() -> u32 {
    24 * 30
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl(),
            max_ttl_hours: default_max_ttl(),
        }
    }
}

/// One mock login account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MockAccount {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl MockAccount {
    fn new(username: &str, password: &str, name: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role,
        }
    }
}

/// Mock authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_accounts")]
    pub accounts: Vec<MockAccount>,
}

fn default_accounts() -> Vec<MockAccount> {
    vec![
        MockAccount::new("admin", "password", "Admin User", Role::Admin),
        MockAccount::new("staff", "password", "Staff Member", Role::Staff),
        MockAccount::new("user", "password", "Guest User", Role::Guest),
    ]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> String {
        format!("habesha_feedback={},tower_http=debug", self.level)
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("habesha").join("config.toml")),
            Some(PathBuf::from("/etc/habesha/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(db_path) = std::env::var("HABESHA_DB_PATH") {
            self.storage.db_path = db_path;
        }

        if let Ok(host) = std::env::var("HABESHA_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("HABESHA_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(provider) = std::env::var("HABESHA_CHAT_PROVIDER") {
            match provider.parse() {
                Ok(p) => self.chat.provider = p,
                Err(e) => tracing::warn!("Ignoring HABESHA_CHAT_PROVIDER: {}", e),
            }
        }
        if let Ok(key) = std::env::var("HABESHA_GEMINI_API_KEY") {
            self.chat.gemini_api_key = Some(key);
        }

        if let Ok(level) = std::env::var("HABESHA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HABESHA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Habesha Feedback Configuration
#
# Environment variables override these settings:
# - HABESHA_DB_PATH
# - HABESHA_API_HOST
# - HABESHA_API_PORT
# - HABESHA_CHAT_PROVIDER
# - HABESHA_GEMINI_API_KEY
# - HABESHA_LOG_LEVEL
# - HABESHA_LOG_FORMAT

[storage]
# SQLite database file
db_path = "./habesha_feedback.db"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8082

# Allowed CORS origins (empty list allows any origin)
cors_origins = ["http://localhost:8084", "http://127.0.0.1:8084"]

# Request timeout in seconds
request_timeout_secs = 30

# Upper bound for ?limit= on GET /feedback (no limit returns everything)
list_limit = 500

[chat]
# Chat backend: "faq" (built-in answers) or "gemini"
provider = "faq"

# Gemini settings, used when provider = "gemini"
gemini_url = "https://generativelanguage.googleapis.com/v1beta"
gemini_model = "gemini-1.5-flash"
# gemini_api_key = ""

# Timeout for chat backend calls (seconds)
timeout_secs = 20

[sessions]
# Lifetime of contextual feedback tokens (hours)
token_ttl_hours = 72

# Longest lifetime a token may be issued with (hours)
max_ttl_hours = 720

# Mock login accounts. There is no real authentication.
[[auth.accounts]]
username = "admin"
password = "password"
name = "Admin User"
role = "admin"

[[auth.accounts]]
username = "staff"
password = "password"
name = "Staff Member"
role = "staff"

[[auth.accounts]]
username = "user"
password = "password"
name = "Guest User"
role = "guest"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();

        assert_eq!(config.api.port, 8082);
        assert_eq!(config.chat.provider, ChatProvider::Faq);
        assert_eq!(config.sessions.token_ttl_hours, 72);
        assert_eq!(config.auth.accounts, default_accounts());
        assert_eq!(config.storage.db_path, "./habesha_feedback.db");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [chat]
            provider = "gemini"
            gemini_api_key = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.chat.provider, ChatProvider::Gemini);
        assert_eq!(config.chat.gemini_api_key.as_deref(), Some("abc"));
        assert_eq!(config.chat.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.api.list_limit, 500);
        assert_eq!(config.auth.accounts.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/habesha.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nport = \"eighty\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_log_filter_directive() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "JSON".to_string(),
        };
        assert_eq!(logging.filter_directive(), "habesha_feedback=debug,tower_http=debug");
        assert!(logging.is_json());
    }
}
