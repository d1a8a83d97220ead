use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

use crate::modules::reports::RefreshPolicy;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub store: StoreBackend,
    pub database: Option<DatabaseConfig>,
    pub registration: CollaboratorConfig,
    pub payment: CollaboratorConfig,
    pub refresh_policy: RefreshPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Where report rows are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    MySql,
    Memory,
}

/// Endpoint and transport settings for one upstream service
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorConfig {
    pub base_url: String,
    pub path: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl CollaboratorConfig {
    /// Base URL and path joined with exactly one slash
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::configuration(format!("Invalid LOG_FORMAT: {}", other))),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StoreBackend::MySql),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::configuration(format!("Invalid REPORT_STORE: {}", other))),
        }
    }
}

/// Read `key`, falling back to `default`, and parse it
pub(crate) fn env_or<T: FromStr>(key: &str, default: &str) -> Result<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::configuration(format!("Invalid {}", key)))
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| AppError::configuration(format!("{} not set", key)))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let store: StoreBackend = env_or("REPORT_STORE", "mysql")?;
        let database = match store {
            StoreBackend::MySql => Some(DatabaseConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        let timeout_secs: u64 = env_or("COLLABORATOR_TIMEOUT_SECS", "10")?;
        let max_retries: u32 = env_or("COLLABORATOR_MAX_RETRIES", "2")?;

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env_or("LOG_FORMAT", "pretty")?,
            },
            server: ServerConfig::from_env()?,
            store,
            database,
            registration: CollaboratorConfig {
                base_url: required("REGISTRATION_BASE_URL")?,
                path: env::var("REGISTRATION_TUITION_LIST_PATH")
                    .unwrap_or_else(|_| "/api/v1/tuition/get/all".to_string()),
                timeout_secs,
                max_retries,
            },
            payment: CollaboratorConfig {
                base_url: required("PAYMENT_BASE_URL")?,
                path: env::var("PAYMENT_PAID_STUDENTS_PATH").unwrap_or_else(|_| {
                    "/api/v1/payment/get/paid/{tuitionId}/{month}".to_string()
                }),
                timeout_secs,
                max_retries,
            },
            refresh_policy: refresh_policy_from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::configuration("SERVER_PORT must be greater than 0"));
        }

        if self.store == StoreBackend::MySql && self.database.is_none() {
            return Err(AppError::configuration(
                "REPORT_STORE=mysql requires DATABASE_URL",
            ));
        }

        for (name, collaborator) in [
            ("REGISTRATION_BASE_URL", &self.registration),
            ("PAYMENT_BASE_URL", &self.payment),
        ] {
            if !collaborator.base_url.starts_with("http://")
                && !collaborator.base_url.starts_with("https://")
            {
                return Err(AppError::configuration(format!(
                    "{} must be an http(s) URL",
                    name
                )));
            }
            if collaborator.timeout_secs == 0 {
                return Err(AppError::configuration(
                    "COLLABORATOR_TIMEOUT_SECS must be greater than 0",
                ));
            }
            if collaborator.max_retries > 10 {
                return Err(AppError::configuration(
                    "COLLABORATOR_MAX_RETRIES must be at most 10",
                ));
            }
        }

        if let RefreshPolicy::Interval(interval) = self.refresh_policy {
            if interval.is_zero() {
                return Err(AppError::configuration(
                    "REPORT_REFRESH_INTERVAL_SECS must be greater than 0",
                ));
            }
        }

        Ok(())
    }
}

fn refresh_policy_from_env() -> Result<RefreshPolicy> {
    let policy = env::var("REPORT_REFRESH_POLICY").unwrap_or_else(|_| "always".to_string());
    match policy.to_lowercase().as_str() {
        "always" => Ok(RefreshPolicy::EveryRead),
        "manual" => Ok(RefreshPolicy::Manual),
        "interval" => {
            let secs: u64 = env_or("REPORT_REFRESH_INTERVAL_SECS", "60")?;
            Ok(RefreshPolicy::Interval(Duration::from_secs(secs)))
        }
        other => Err(AppError::configuration(format!(
            "Invalid REPORT_REFRESH_POLICY: {}",
            other
        ))),
    }
}
