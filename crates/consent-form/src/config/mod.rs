use crate::workflows::consent::domain::Activity;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Activities offered when `CONSENT_ACTIVITIES` is not set.
pub const DEFAULT_ACTIVITIES: [&str; 4] = [
    "Build a deck",
    "Build a fence",
    "Construct a garage",
    "Demolish a building",
];

/// Lifetime of a transient error banner unless overridden.
pub const DEFAULT_ERROR_TTL_MS: u64 = 5000;

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
    pub consent: ConsentConfig,
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
            consent: ConsentConfig::from_env()?,
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

/// Session inputs fixed at startup: the activity list, banner lifetime, and
/// optional rules engine fixtures.
#[derive(Debug, Clone)]
pub struct ConsentConfig {
    pub activities: Vec<Activity>,
    pub error_ttl: Duration,
    pub scenario_path: Option<PathBuf>,
    pub standards_path: Option<PathBuf>,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            activities: DEFAULT_ACTIVITIES.iter().map(|label| Activity::new(*label)).collect(),
            error_ttl: Duration::from_millis(DEFAULT_ERROR_TTL_MS),
            scenario_path: None,
            standards_path: None,
        }
    }
}

impl ConsentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("CONSENT_ACTIVITIES") {
            config.activities = parse_activities(&raw)?;
        }

        if let Ok(raw) = env::var("CONSENT_ERROR_TTL_MS") {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidErrorTtl { value: raw.clone() })?;
            config.error_ttl = Duration::from_millis(millis);
        }

        config.scenario_path = env::var_os("CONSENT_SCENARIO_PATH").map(PathBuf::from);
        config.standards_path = env::var_os("CONSENT_STANDARDS_PATH").map(PathBuf::from);

        Ok(config)
    }
}

/// Split a `;`-separated activity list, dropping blank entries.
pub fn parse_activities(raw: &str) -> Result<Vec<Activity>, ConfigError> {
    let activities: Vec<Activity> = raw
        .split(';')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(Activity::new)
        .collect();

    if activities.is_empty() {
        return Err(ConfigError::EmptyActivities);
    }
    Ok(activities)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidErrorTtl { value: String },
    EmptyActivities,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidErrorTtl { value } => write!(
                f,
                "CONSENT_ERROR_TTL_MS must be a whole number of milliseconds (got '{}')",
                value
            ),
            ConfigError::EmptyActivities => {
                write!(f, "CONSENT_ACTIVITIES must name at least one activity")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidErrorTtl { .. }
            | ConfigError::EmptyActivities => None,
        }
    }
}
