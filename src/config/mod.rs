mod facility;

use std::env;

pub use facility::{AreaConfig, FacilityConfig, PoolConfig};

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
    pub run_migrations: bool,

    // API settings
    pub api_host: String,
    pub api_port: u16,
    /// Prefix the dashboard endpoints are nested under
    pub api_base_path: String,

    // Rate limiting
    pub disable_rate_limiting: bool,
    /// Seconds between quota replenishments: one request per this many
    /// seconds once the burst is spent (tower_governor `per_second`)
    pub rate_limit_per_second: u64,
    /// Requests a client may make back to back before the period applies
    pub rate_limit_burst: u32,

    // Areas, capacities and pool settings
    pub facility: FacilityConfig,

    // Application metadata
    pub deployment: Deployment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            run_migrations: true,
            api_host: "0.0.0.0".to_string(),
            api_port: 5000,
            api_base_path: "/smartceu/api/v1/dashboard".to_string(),
            disable_rate_limiting: false,
            rate_limit_per_second: 5,
            rate_limit_burst: 60,
            facility: FacilityConfig::default(),
            deployment: Deployment::Local,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The facility layout comes from the JSON file named by `FACILITY_CONFIG`
    /// when set, otherwise the built-in CEU layout is used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `DATABASE_URL` is not set, or a facility
    /// error if the facility file cannot be read, parsed or validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let facility = match env::var("FACILITY_CONFIG") {
            Ok(path) => FacilityConfig::from_file(&path)?,
            Err(_) => FacilityConfig::default(),
        };
        facility.validate()?;

        Ok(Self {
            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            run_migrations: env::var("RUN_MIGRATIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(defaults.run_migrations),

            // API settings
            api_host: env::var("API_HOST").unwrap_or(defaults.api_host),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(defaults.api_port),
            api_base_path: normalize_base_path(
                &env::var("API_BASE_PATH").unwrap_or(defaults.api_base_path),
            ),

            // Rate limiting
            disable_rate_limiting: env::var("DISABLE_RATE_LIMITING")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            rate_limit_per_second: env::var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(defaults.rate_limit_per_second),
            rate_limit_burst: env::var("RATE_LIMIT_BURST")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(defaults.rate_limit_burst),

            facility,

            // Application metadata
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

/// Leading slash, no trailing slash. An empty or "/" prefix mounts at the root.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid facility configuration: {0}")]
    InvalidFacility(String),

    #[error("Failed to read facility config {path}: {source}")]
    FacilityFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse facility config {path}: {source}")]
    FacilityParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path("/api/"), "/api");
        assert_eq!(normalize_base_path("api/v1"), "/api/v1");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
    }

    #[test]
    fn deployment_parsing_falls_back_to_local() {
        assert_eq!(Deployment::from_str("Production"), Deployment::Prod);
        assert_eq!(Deployment::from_str("staging"), Deployment::Stage);
        assert_eq!(Deployment::from_str("whatever"), Deployment::Local);
    }
}
