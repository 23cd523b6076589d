use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::visa::domain::TravelPurpose;
use crate::visa::evaluation::EvaluationConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub rules: RulesConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            rules: RulesConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the rule catalog comes from and how the evaluator treats it.
#[derive(Debug, Clone, Default)]
pub struct RulesConfig {
    /// JSON rule table replacing the built-in one.
    pub catalog_path: Option<PathBuf>,
    /// Embassy CSV overlaid on whichever catalog is loaded.
    pub embassies_csv: Option<PathBuf>,
    pub evaluation: EvaluationConfig,
}

impl RulesConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let catalog_path = non_empty_var("VISA_RULES_PATH").map(PathBuf::from);
        let embassies_csv = non_empty_var("VISA_EMBASSIES_CSV").map(PathBuf::from);

        let escalated_purposes = match non_empty_var("VISA_ESCALATE_PURPOSES") {
            Some(raw) => parse_purposes(&raw)?,
            None => BTreeSet::new(),
        };
        let strong_passport_heuristic = match non_empty_var("VISA_STRONG_PASSPORT_HEURISTIC") {
            Some(raw) => parse_flag("VISA_STRONG_PASSPORT_HEURISTIC", &raw)?,
            None => true,
        };

        Ok(Self {
            catalog_path,
            embassies_csv,
            evaluation: EvaluationConfig {
                escalated_purposes,
                strong_passport_heuristic,
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a comma-separated purpose list such as `business,conference`.
pub fn parse_purposes(raw: &str) -> Result<BTreeSet<TravelPurpose>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            TravelPurpose::parse(entry).ok_or_else(|| ConfigError::InvalidPurpose {
                value: entry.to_string(),
            })
        })
        .collect()
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPurpose { value: String },
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPurpose { value } => write!(
                f,
                "VISA_ESCALATE_PURPOSES contains unknown travel purpose '{}'",
                value
            ),
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{} must be true or false, got '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPurpose { .. }
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
