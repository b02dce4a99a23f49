use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use url::Url;

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
    pub completion: CompletionConfig,
    pub review: ReviewConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");
        let log_format = LogFormat::from_str(&var_or("APP_LOG_FORMAT", "compact"));

        let completion = CompletionConfig {
            api_key: non_blank_var("OPENAI_API_KEY"),
            base_url: parse_url("OPENAI_API_BASE", DEFAULT_COMPLETION_BASE)?,
            model: var_or("OPENAI_MODEL", DEFAULT_COMPLETION_MODEL),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };

        let timeout_secs = var_or("REVIEW_STRATEGY_TIMEOUT_SECS", "15")
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let review = ReviewConfig {
            page_origin: parse_url("REVIEW_PAGE_ORIGIN", DEFAULT_PAGE_ORIGIN)?,
            server_origin: parse_url("REVIEW_SERVER_ORIGIN", DEFAULT_SERVER_ORIGIN)?,
            strategy_timeout: Duration::from_secs(timeout_secs),
            default_maps_url: var_or("REVIEW_DEFAULT_MAPS_URL", DEFAULT_MAPS_URL),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            completion,
            review,
        })
    }
}

pub const DEFAULT_COMPLETION_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_PAGE_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_SERVER_ORIGIN: &str = "http://127.0.0.1:3000";
pub const DEFAULT_MAPS_URL: &str = "https://www.google.com/maps";

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_url(name: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = var_or(name, default);
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })
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

/// Output layout for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Chat-completion provider used by the relay endpoint and the direct strategy.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Server-side credential. The relay endpoint refuses requests without it.
    pub api_key: Option<String>,
    pub base_url: Url,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionConfig {
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            api_key: None,
            base_url,
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Where the review pipeline sends its relay requests and where it navigates afterwards.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Origin the site pages are served from; relative relay paths resolve against it.
    pub page_origin: Url,
    /// Explicit API origin used by the absolute relay attempt.
    pub server_origin: Url,
    pub strategy_timeout: Duration,
    pub default_maps_url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUrl { name, .. } => write!(f, "{name} must be an absolute URL"),
            ConfigError::InvalidTimeout => {
                write!(f, "REVIEW_STRATEGY_TIMEOUT_SECS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidUrl { source, .. } => Some(source),
        }
    }
}
