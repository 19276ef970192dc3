use common::StorageConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec![],
            max_age: 3600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Username of the admin account created on startup, if any.
    #[serde(default)]
    pub bootstrap_admin: Option<String>,
    #[serde(default)]
    pub bootstrap_password: Option<String>,
}

/// Outbound contact-form email.
#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// When false, messages are only logged. Default: false.
    #[serde(default)]
    pub enabled: bool,
    /// HTTP endpoint of the email API.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_mail_from")]
    pub from: String,
    /// Inbox that receives contact-form messages.
    #[serde(default = "default_mail_to")]
    pub to: String,
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

fn default_mail_from() -> String {
    "DatoDirecto <no-reply@datodirecto.com>".into()
}
fn default_mail_to() -> String {
    "contacto@datodirecto.com".into()
}
fn default_mail_timeout() -> u64 {
    10
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key: String::new(),
            from: default_mail_from(),
            to: default_mail_to(),
            timeout_secs: default_mail_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Absolute origin used to build public media URLs (no trailing slash).
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mail: MailConfig,
    pub site: SiteConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("site.public_base_url", "http://127.0.0.1:3000")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., DATODIRECTO__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("DATODIRECTO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
