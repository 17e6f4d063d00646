//! Engine configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Env var | Default | Meaning |
//! |---------|---------|---------|
//! | UPLOAD_DIR | ./uploads | blob storage root |
//! | DEFAULT_LOCATION | Chicago, IL | region label for new restaurants |
//! | TX_MAX_RETRIES | 5 | transaction retry cap under contention |
//! | LOG_LEVEL | info | tracing level filter |

/// Engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Blob storage root directory
    pub upload_dir: String,
    /// Region label applied to restaurants created during review submission
    pub default_location: String,
    /// How many times a contended transaction body is re-run before failing
    pub tx_max_retries: u32,
    /// Log level: trace | debug | info | warn | error
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into()),
            default_location: std::env::var("DEFAULT_LOCATION")
                .unwrap_or_else(|_| "Chicago, IL".into()),
            tx_max_retries: std::env::var("TX_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upload_dir: "./uploads".into(),
            default_location: "Chicago, IL".into(),
            tx_max_retries: 5,
            log_level: "info".into(),
        }
    }
}
