//! Runtime configuration loaded from a TOML file.
//!
//! Every field carries a serde default so a partial file (or no file at all)
//! still yields a runnable configuration. The path is taken from the
//! `ATTENDANCE_NOTIFY_CONFIG` environment variable and falls back to
//! `config.toml` in the working directory.

use common::model::user::Role;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_ENV: &str = "ATTENDANCE_NOTIFY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Base URL of the guardian-facing acknowledgment page; the notification id is
    /// appended to it. That page calls `POST /api/notifications/{id}/ack`, this
    /// server does not serve it.
    #[serde(default = "default_ack_base_url")]
    pub ack_base_url: String,
    /// Static institutional contact line closing every message.
    #[serde(default = "default_contact_line")]
    pub contact_line: String,
    #[serde(default = "default_upload_limit_bytes")]
    pub upload_limit_bytes: usize,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub sms: SmsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            ack_base_url: default_ack_base_url(),
            contact_line: default_contact_line(),
            upload_limit_bytes: default_upload_limit_bytes(),
            auth: AuthConfig::default(),
            sms: SmsConfig::default(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> String {
    "attendance.sqlite".to_string()
}

fn default_ack_base_url() -> String {
    "http://127.0.0.1:3000/ack".to_string()
}

fn default_contact_line() -> String {
    "For queries contact the college office.".to_string()
}

fn default_upload_limit_bytes() -> usize {
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_expire_secs")]
    pub token_expire_secs: u64,
    /// Account created when the users table is empty at startup.
    #[serde(default = "default_username")]
    pub default_username: String,
    #[serde(default = "default_password")]
    pub default_password: String,
    #[serde(default = "default_role")]
    pub default_role: Role,
    /// Required when `default_role` is `hod`.
    #[serde(default)]
    pub default_department: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_expire_secs: default_token_expire_secs(),
            default_username: default_username(),
            default_password: default_password(),
            default_role: default_role(),
            default_department: None,
        }
    }
}

fn default_jwt_secret() -> String {
    "change-this-secret".to_string()
}

fn default_token_expire_secs() -> u64 {
    86400
}

fn default_username() -> String {
    "operator".to_string()
}

fn default_password() -> String {
    "changeme".to_string()
}

fn default_role() -> Role {
    Role::Operator
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    Twilio,
    /// Dry run: messages are written to the log instead of being sent.
    Log,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    #[serde(default = "default_provider")]
    pub provider: SmsProvider,
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    /// Sender number passed as the source of every message.
    #[serde(default)]
    pub from_number: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            api_base: default_api_base(),
        }
    }
}

fn default_provider() -> SmsProvider {
    SmsProvider::Log
}

fn default_api_base() -> String {
    "https://api.twilio.com".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads the file named by `ATTENDANCE_NOTIFY_CONFIG` (or `config.toml`).
    ///
    /// A missing file is not an error: defaults are used and a warning is logged.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            warn!("Config file {} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}
