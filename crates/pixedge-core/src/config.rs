//! Configuration module
//!
//! Dispatcher configuration is read from the environment (and an optional `.env`
//! file) once at startup.

use std::env;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_PROVIDER_URL: &str = "http://localhost:9000/process";
const PROVIDER_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_MB: usize = 10;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Dispatcher settings
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    pub server_port: u16,
    pub environment: String,
    pub provider_url: String,
    pub provider_timeout_secs: u64,
    pub max_file_size_bytes: usize,
    pub http_concurrency_limit: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<DispatcherConfig>);

impl Config {
    fn inner(&self) -> &DispatcherConfig {
        &self.0
    }

    pub fn new(config: DispatcherConfig) -> Self {
        Config(Box::new(config))
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = DispatcherConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn provider_url(&self) -> &str {
        &self.inner().provider_url
    }

    pub fn provider_timeout_secs(&self) -> u64 {
        self.inner().provider_timeout_secs
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().http_concurrency_limit
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            environment: "development".to_string(),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            provider_timeout_secs: PROVIDER_TIMEOUT_SECS,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
        }
    }
}

fn mb_to_bytes(mb: usize) -> Option<usize> {
    mb.checked_mul(1024)?.checked_mul(1024)
}

impl DispatcherConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);
        let max_file_size_bytes = mb_to_bytes(max_file_size_mb).ok_or_else(|| {
            anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", max_file_size_mb)
        })?;

        Ok(Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            provider_url: env::var("PROVIDER_URL")
                .unwrap_or_else(|_| DEFAULT_PROVIDER_URL.to_string()),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| PROVIDER_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(PROVIDER_TIMEOUT_SECS),
            max_file_size_bytes,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.provider_url.starts_with("http://") || self.provider_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "PROVIDER_URL must start with http:// or https://, got '{}'",
                self.provider_url
            ));
        }
        if self.provider_timeout_secs == 0 {
            return Err(anyhow::anyhow!("PROVIDER_TIMEOUT_SECS must be greater than 0"));
        }
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        Ok(())
    }
}
