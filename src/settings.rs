use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::attributes::CookieAttributes;
use crate::compiler::compile;
use crate::errors::CompileError;
use crate::intent::{Expiration, Intent, NavigationSource};

/// File name looked up in the working directory and `COOKIE_INTENT_CONFIG_DIR`
pub const CATALOG_FILE: &str = "Cookies.toml";

/// A catalog of named cookie intents, usually loaded from `Cookies.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogSettings {
    pub logging: LoggingSettings,
    pub cookies: Vec<IntentSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Serialized form of an [`Intent`]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IntentSettings {
    pub name: String,
    pub value: String,

    // Environment variable holding the value, takes precedence over `value`
    pub value_env: Option<String>,

    pub expires: ExpirationSettings,
    pub return_to: String,
    pub return_on_navigation_from: Option<NavigationSource>,
    pub reveal_to_javascript: bool,
}

/// Raw expiration fields as written in the catalog
///
/// `at` and `after_seconds` are mutually exclusive. When neither is given,
/// `session = true` selects a session cookie.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ExpirationSettings {
    pub session: bool,
    pub at: Option<DateTime<Utc>>,
    pub after_seconds: Option<i64>,
}

impl ExpirationSettings {
    /// Resolve the raw fields into an [`Expiration`]
    ///
    /// Returns `Ok(None)` when nothing is set, leaving the compiler to report
    /// the missing expiration.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::ConflictingExpiration`] if both `at` and
    /// `after_seconds` are set, or [`CompileError::ExpirationOutOfRange`] if
    /// `after_seconds` exceeds the representable duration
    pub fn to_expiration(&self) -> Result<Option<Expiration>, CompileError> {
        match (self.at, self.after_seconds) {
            (Some(_), Some(_)) => Err(CompileError::ConflictingExpiration),
            (Some(at), None) => Ok(Some(Expiration::at(at))),
            (None, Some(seconds)) => Duration::try_seconds(seconds)
                .map(|duration| Some(Expiration::after(duration)))
                .ok_or(CompileError::ExpirationOutOfRange(seconds)),
            (None, None) if self.session => Ok(Some(Expiration::WHEN_UA_IS_CLOSED)),
            (None, None) => Ok(None),
        }
    }
}

impl IntentSettings {
    /// Get the cookie value, checking the environment variable first
    #[must_use]
    pub fn get_value(&self) -> String {
        if let Some(env_var) = &self.value_env {
            if let Ok(value) = std::env::var(env_var) {
                return value;
            }
            warn!(
                "Environment variable {env_var} for cookie '{}' is not set, using configured value",
                self.name
            );
        }
        self.value.clone()
    }

    /// Convert to an [`Intent`]
    ///
    /// # Errors
    ///
    /// Returns an error if the expiration fields conflict
    pub fn to_intent(&self) -> Result<Intent, CompileError> {
        Ok(Intent {
            name: self.name.clone(),
            value: self.get_value(),
            expires: self.expires.to_expiration()?,
            return_to: self.return_to.clone(),
            return_on_navigation_from: self.return_on_navigation_from,
            reveal_to_javascript: self.reveal_to_javascript,
        })
    }

    /// Convert and compile in one step
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn compile(&self) -> Result<CookieAttributes, CompileError> {
        compile(&self.to_intent()?)
    }
}

impl CatalogSettings {
    /// Load the catalog
    ///
    /// With an explicit `path` only that file is read. Otherwise settings are
    /// loaded with the following priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Cookies.toml in `COOKIE_INTENT_CONFIG_DIR` (if specified and exists)
    /// 3. Cookies.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog file cannot be read or parsed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_base_settings()?,
        };
        Self::apply_logging_env_overrides(&mut settings.logging);
        Ok(settings)
    }

    /// Initialize the logger with `logging.level` as the default filter
    ///
    /// # Errors
    ///
    /// Returns an error if a logger is already installed
    pub fn init_logging(&self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.logging.level.as_str()),
        )
        .try_init()
        .context("Failed to initialize logger")?;

        info!("Loaded cookie catalog with {} entries", self.cookies.len());
        Ok(())
    }

    /// Read a catalog from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse a catalog from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or contains an unsupported
    /// navigation source
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(basic_toml::from_str(content)?)
    }

    fn load_base_settings() -> Result<Self> {
        let mut settings = Self::default();

        let default_path = Path::new(CATALOG_FILE);
        if default_path.exists() {
            settings = Self::from_file(default_path)?;
        }

        if let Ok(config_dir) = std::env::var("COOKIE_INTENT_CONFIG_DIR") {
            let config_path = Path::new(&config_dir).join(CATALOG_FILE);
            if config_path.exists() {
                settings = Self::from_file(&config_path)?;
            } else {
                eprintln!(
                    "ℹ COOKIE_INTENT_CONFIG_DIR set but no {CATALOG_FILE} found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment overrides for logging settings
    pub fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Compile every catalog entry, keeping per-entry results in catalog order
    #[must_use]
    pub fn compile_all(&self) -> Vec<(&str, Result<CookieAttributes, CompileError>)> {
        self.cookies
            .iter()
            .map(|cookie| (cookie.name.as_str(), cookie.compile()))
            .collect()
    }

    /// Get a catalog entry by cookie name
    #[must_use]
    pub fn get_cookie(&self, name: &str) -> Option<&IntentSettings> {
        self.cookies.iter().find(|c| c.name == name)
    }
}
