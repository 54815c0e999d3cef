//! Service configuration loaded from the environment

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::services::credentials::ApiKey;

/// Highest numbered `GEMINI_KEY_<n>` variable that is read
pub const MAX_PROVIDER_KEYS: usize = 10;

pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 8;

/// Operating mode; controls log verbosity and how much error detail reaches clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingMode {
    Development,
    #[default]
    Production,
    Test,
}

impl OperatingMode {
    pub fn is_development(self) -> bool {
        self == OperatingMode::Development
    }
}

impl FromStr for OperatingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(OperatingMode::Development),
            "production" | "prod" => Ok(OperatingMode::Production),
            "test" => Ok(OperatingMode::Test),
            other => Err(format!("Unknown operating mode: {}", other)),
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingMode::Development => write!(f, "development"),
            OperatingMode::Production => write!(f, "production"),
            OperatingMode::Test => write!(f, "test"),
        }
    }
}

/// Generation provider settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Ordered credential list, fixed at process start
    pub keys: Vec<ApiKey>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }
}

/// Full service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub bind: String,
    pub jwt_secret: Option<ApiKey>,
    pub mode: OperatingMode,
    pub generator: GeneratorConfig,
}

impl ServiceConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = match non_empty("MOCKNCRACK_DB_PATH") {
            Some(path) => expand_path(&path),
            None => default_db_path()?,
        };

        let mode = match non_empty("ENVIRONMENT") {
            Some(value) => value.parse::<OperatingMode>().map_err(Error::config)?,
            None => OperatingMode::default(),
        };

        let keys: Vec<ApiKey> = (1..=MAX_PROVIDER_KEYS)
            .filter_map(|n| non_empty(&format!("GEMINI_KEY_{}", n)))
            .map(|k| ApiKey::new(k.trim()))
            .collect();

        let timeout_secs = match non_empty("GENERATION_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                Error::config(format!("GENERATION_TIMEOUT_SECS is not a number: {}", value))
            })?,
            None => DEFAULT_GENERATION_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(Error::config("GENERATION_TIMEOUT_SECS must be greater than 0"));
        }

        Ok(Self {
            db_path,
            bind: non_empty("MOCKNCRACK_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            jwt_secret: non_empty("MOCKNCRACK_JWT_SECRET").map(ApiKey::new),
            mode,
            generator: GeneratorConfig {
                keys,
                model: non_empty("GEMINI_MODEL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: non_empty("GEMINI_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    /// JWT secret, required by anything that issues or verifies identity tokens
    pub fn require_jwt_secret(&self) -> Result<&ApiKey> {
        self.jwt_secret
            .as_ref()
            .ok_or_else(|| Error::config("MOCKNCRACK_JWT_SECRET is not set"))
    }

    /// Every secret the log sink must redact
    pub fn secrets(&self) -> Vec<String> {
        self.generator
            .keys
            .iter()
            .chain(self.jwt_secret.iter())
            .map(|k| k.expose().to_string())
            .collect()
    }
}

/// Expand `~` and environment references in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Default database location under the platform data directory
pub fn default_db_path() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| Error::config("Could not determine a data directory"))?;
    Ok(base.join("mockncrack").join("mockncrack.db"))
}
