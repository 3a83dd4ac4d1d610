use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Uploads
    pub max_upload_bytes: usize,

    // Caching
    pub chart_cache_ttl_seconds: u64,

    // Application metadata
    pub deployment: Deployment,
}

/// Read an optional variable, falling back to `default` when unset or unparsable.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env_or("API_PORT", 8000),

            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024), // 10MB default

            chart_cache_ttl_seconds: env_or("CHART_CACHE_TTL_SECONDS", 300), // 5 minutes default

            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_accepts_long_and_short_names() {
        assert_eq!(Deployment::from_str("PROD"), Deployment::Prod);
        assert_eq!(Deployment::from_str("staging"), Deployment::Stage);
        assert_eq!(Deployment::from_str("development"), Deployment::Dev);
        assert_eq!(Deployment::from_str("anything"), Deployment::Local);
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            api_host: "127.0.0.1".to_string(),
            api_port: 8000,
            max_upload_bytes: 1024,
            chart_cache_ttl_seconds: 60,
            deployment: Deployment::Local,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
    }
}
