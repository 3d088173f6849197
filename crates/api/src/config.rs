//! # API Configuration Module
//!
//! Loads the GymDesk server configuration from environment variables,
//! applying defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: Host address to bind to (default: "0.0.0.0")
//! - `API_PORT`: Port to listen on (default: 5000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `JWT_SECRET`: Secret used to sign bearer tokens (required)
//! - `JWT_EXPIRY_HOURS`: Token lifetime (default: 168)
//! - `GYM_TIMEZONE`: IANA timezone that defines the gym's calendar day
//!   (default: "Asia/Kolkata")
//! - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`:
//!   image host credentials; uploads are disabled unless all three are set

use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use std::env;
use tracing::Level;

/// Credentials for the Cloudinary upload API.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Configuration for the GymDesk API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use gymdesk_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// HMAC secret for signing bearer tokens
    pub jwt_secret: String,

    /// Lifetime of issued tokens
    pub jwt_expiry_hours: i64,

    /// Timezone whose midnight starts a new attendance day
    pub timezone: Tz,

    /// Image host credentials; `None` disables uploads
    pub cloudinary: Option<CloudinaryConfig>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` or `JWT_SECRET` is not set
    /// - `API_PORT` cannot be parsed as a u16
    /// - `JWT_EXPIRY_HOURS` is not a positive integer
    /// - `GYM_TIMEZONE` is not a known IANA timezone
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url =
            env::var("DATABASE_URL").wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Security settings
        let jwt_secret =
            env::var("JWT_SECRET").wrap_err("JWT_SECRET environment variable must be set")?;
        if jwt_secret.trim().is_empty() {
            return Err(eyre!("JWT_SECRET must not be empty"));
        }
        let jwt_expiry_hours: i64 = env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse()
            .wrap_err("Invalid JWT_EXPIRY_HOURS value")?;
        if jwt_expiry_hours <= 0 {
            return Err(eyre!("JWT_EXPIRY_HOURS must be positive"));
        }

        let timezone = parse_timezone(
            &env::var("GYM_TIMEZONE").unwrap_or_else(|_| "Asia/Kolkata".to_string()),
        )?;

        let cloudinary = match (
            env::var("CLOUDINARY_CLOUD_NAME"),
            env::var("CLOUDINARY_API_KEY"),
            env::var("CLOUDINARY_API_SECRET"),
        ) {
            (Ok(cloud_name), Ok(api_key), Ok(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            jwt_secret,
            jwt_expiry_hours,
            timezone,
            cloudinary,
        })
    }

    /// Returns the server address as a string (e.g., "0.0.0.0:5000")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Maps a `LOG_LEVEL` value to a tracing level, falling back to INFO.
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn parse_timezone(value: &str) -> Result<Tz> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|e| eyre!("Invalid GYM_TIMEZONE '{}': {}", value.trim(), e))
}
