use std::fmt;
use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "Ocular";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hosted multimodal model used when `OCULAR_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Public Generative Language API endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Per-request timeout for the outbound analysis call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Local address of the HTTP presentation surface.
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// Base delay for retry backoff (only used when retries are enabled).
pub const DEFAULT_RETRY_BASE_MS: u64 = 1000;

/// Largest upload accepted by the HTTP surface (20 MiB).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Environment variables holding the API credential, in lookup order.
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,ocular_lib=debug"
    } else {
        "info"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API credential missing: set GEMINI_API_KEY (or API_KEY)")]
    MissingApiKey,

    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddress(String),
}

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_ms: u64,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Loads a `.env` file first when one exists. A missing credential is
    /// fatal here so the server never starts without one.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|name| non_blank(name))
            .map(|key| key.trim().to_string())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = non_blank("OCULAR_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = non_blank("OCULAR_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = parse_number(
            "OCULAR_TIMEOUT_SECS",
            non_blank("OCULAR_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "OCULAR_TIMEOUT_SECS",
                value: "0".into(),
            });
        }
        let max_retries =
            parse_number("OCULAR_MAX_RETRIES", non_blank("OCULAR_MAX_RETRIES"), 0)?;
        let retry_base_ms = parse_number(
            "OCULAR_RETRY_BASE_MS",
            non_blank("OCULAR_RETRY_BASE_MS"),
            DEFAULT_RETRY_BASE_MS,
        )?;

        let bind = non_blank("OCULAR_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress(bind.clone()))?;

        Ok(Self {
            api_key,
            model,
            api_base,
            timeout_secs,
            max_retries,
            retry_base_ms,
            bind_addr,
        })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_base_ms", &self.retry_base_ms)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
