use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Distinguishes runtime behavior for different stages of the client.
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

/// Top-level configuration for the client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url =
            env::var("APP_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let base_url = validate_base_url(&base_url)?;

        let timeout_secs = match env::var("APP_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let page_size = match env::var("APP_PAGE_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
                .ok_or(ConfigError::InvalidPageSize)?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        let state_dir = match env::var("APP_STATE_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_state_dir()?,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
                page_size,
            },
            storage: StorageConfig { state_dir },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where and how the REST API is reached.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub page_size: u32,
}

impl ApiConfig {
    pub fn set_base_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.base_url = validate_base_url(raw)?;
        Ok(())
    }
}

/// Durable client storage location.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub state_dir: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match reqwest::Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidBaseUrl {
            value: raw.to_string(),
        }),
    }
}

fn default_state_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("stimacasa"))
        .ok_or(ConfigError::MissingStateDir)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl { value: String },
    InvalidTimeout,
    InvalidPageSize,
    MissingStateDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl { value } => write!(
                f,
                "APP_API_BASE_URL must be an absolute http(s) URL, got '{value}'"
            ),
            ConfigError::InvalidTimeout => {
                write!(f, "APP_HTTP_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidPageSize => {
                write!(f, "APP_PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}")
            }
            ConfigError::MissingStateDir => write!(
                f,
                "no platform data directory found; set APP_STATE_DIR explicitly"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
