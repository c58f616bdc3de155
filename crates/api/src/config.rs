use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    /// Credentials guarding the technician pages
    pub technician: TechnicianConfig,
    /// Technician notification mail
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Workbook holding the ledger
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// The single technician account.
#[derive(Clone, Deserialize)]
pub struct TechnicianConfig {
    #[serde(default = "default_technician_username")]
    pub username: String,

    #[serde(default = "default_technician_password")]
    pub password: String,
}

impl std::fmt::Debug for TechnicianConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TechnicianConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    90
}
fn default_store_path() -> String {
    "solicitacoes_manutencao.xlsx".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_technician_username() -> String {
    "tecnico".to_string()
}
fn default_technician_password() -> String {
    "1234".to_string()
}

/// Email configuration for technician notifications.
#[derive(Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether email sending is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Email provider: smtp, or console (for development)
    #[serde(default = "default_email_provider")]
    pub provider: String,

    #[serde(default)]
    pub smtp_host: String,

    /// Submission port; STARTTLS is negotiated on it
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: String,

    #[serde(default)]
    pub smtp_password: String,

    #[serde(default = "default_smtp_timeout")]
    pub smtp_timeout_secs: u64,

    /// Sender address (From header)
    #[serde(default)]
    pub sender_email: String,

    /// Where new request notifications go
    #[serde(default)]
    pub technician_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_timeout_secs: default_smtp_timeout(),
            sender_email: String::new(),
            technician_email: String::new(),
        }
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"<redacted>")
            .field("smtp_timeout_secs", &self.smtp_timeout_secs)
            .field("sender_email", &self.sender_email)
            .field("technician_email", &self.technician_email)
            .finish()
    }
}

fn default_email_provider() -> String {
    "console".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout() -> u64 {
    60
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with MI__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("MI").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults, without touching config files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 90

            [store]
            path = "solicitacoes_manutencao.xlsx"

            [logging]
            level = "info"
            format = "json"

            [technician]
            username = "tecnico"
            password = "1234"

            [email]
            enabled = false
            provider = "console"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.store.path.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "MI__STORE__PATH must not be empty".to_string(),
            ));
        }

        if self.technician.username.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "MI__TECHNICIAN__USERNAME must not be empty".to_string(),
            ));
        }

        if self.email.enabled && self.email.provider == "smtp" {
            let required = [
                ("MI__EMAIL__SMTP_HOST", &self.email.smtp_host),
                ("MI__EMAIL__SENDER_EMAIL", &self.email.sender_email),
                ("MI__EMAIL__TECHNICIAN_EMAIL", &self.email.technician_email),
            ];
            if let Some((name, _)) = required.iter().find(|(_, value)| value.is_empty()) {
                return Err(ConfigValidationError::MissingRequired(format!(
                    "{name} must be set when SMTP email is enabled"
                )));
            }
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
