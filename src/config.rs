//! Validator configuration loaded from the environment.
//!
//! Credentials and the site URL are injected by whatever hosts the hook.
//! `.env` loading happens once, in command dispatch, before this is consulted.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::ports::is_field_key;

/// Base URL of the issue tracker.
pub const SITE_URL_VAR: &str = "DATEGUARD_SITE_URL";
/// Field key holding the start date.
pub const START_DATE_FIELD_VAR: &str = "DATEGUARD_START_DATE_FIELD";
/// Basic-auth user.
pub const EMAIL_VAR: &str = "DATEGUARD_EMAIL";
/// Basic-auth API token.
pub const API_TOKEN_VAR: &str = "DATEGUARD_API_TOKEN";
/// Bearer token; takes precedence over basic auth.
pub const BEARER_TOKEN_VAR: &str = "DATEGUARD_BEARER_TOKEN";
/// Request timeout in whole seconds.
pub const TIMEOUT_VAR: &str = "DATEGUARD_TIMEOUT_SECS";
/// Cassette path to record the outbound call into.
pub const RECORD_VAR: &str = "DATEGUARD_RECORD";

/// Start-date field key used when none is configured.
pub const DEFAULT_START_DATE_FIELD: &str = "startdate";
/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while assembling a [`ValidatorConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No site URL was supplied.
    #[error("DATEGUARD_SITE_URL is not set")]
    MissingSiteUrl,
    /// The site URL could not be used as an HTTP base.
    #[error("invalid site URL {value:?}: {reason}")]
    InvalidSiteUrl {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The start-date field key was blank.
    #[error("DATEGUARD_START_DATE_FIELD must not be blank")]
    BlankStartDateField,
    /// The start-date field key contains characters a field key cannot have.
    #[error("invalid DATEGUARD_START_DATE_FIELD {0:?}: expected letters, digits, '_', '-' or '.'")]
    InvalidStartDateField(String),
    /// The timeout was not a positive whole number of seconds.
    #[error("invalid DATEGUARD_TIMEOUT_SECS {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
    /// Only one of email and API token was supplied.
    #[error("DATEGUARD_EMAIL and DATEGUARD_API_TOKEN must be set together")]
    IncompleteBasicAuth,
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// How outbound requests authenticate.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    /// Email plus API token over HTTP basic auth.
    Basic {
        /// Account email.
        email: String,
        /// API token.
        token: String,
    },
    /// Opaque bearer token.
    Bearer(String),
    /// Send no credentials.
    #[default]
    Anonymous,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { email, .. } => {
                f.debug_struct("Basic").field("email", email).field("token", &"***").finish()
            }
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"***").finish(),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Values supplied on the command line, consulted before the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces [`SITE_URL_VAR`].
    pub site: Option<String>,
    /// Replaces [`START_DATE_FIELD_VAR`].
    pub start_date_field: Option<String>,
}

impl ConfigOverrides {
    fn get(&self, name: &str) -> Option<String> {
        match name {
            SITE_URL_VAR => self.site.clone(),
            START_DATE_FIELD_VAR => self.start_date_field.clone(),
            _ => None,
        }
    }
}

/// Everything the validator needs to reach the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Base URL of the tracker (scheme and host, optionally a path prefix).
    pub site_url: Url,
    /// Field key that holds the start date.
    pub start_date_field: String,
    /// Authentication for outbound requests.
    pub credentials: Credentials,
    /// Upper bound on one request.
    pub timeout: Duration,
    /// When set, the outbound call is recorded to this cassette file.
    pub record_path: Option<PathBuf>,
}

impl ValidatorConfig {
    /// Loads configuration from the process environment and `overrides`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required value is missing or malformed.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| overrides.get(name).or_else(|| env::var(name).ok()))
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required value is missing or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let site_url = parse_site_url(&get(SITE_URL_VAR).ok_or(ConfigError::MissingSiteUrl)?)?;

        let start_date_field = match lookup(START_DATE_FIELD_VAR) {
            None => DEFAULT_START_DATE_FIELD.to_string(),
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::BlankStartDateField),
            Some(raw) if !is_field_key(raw.trim()) => {
                return Err(ConfigError::InvalidStartDateField(raw.trim().to_string()))
            }
            Some(raw) => raw.trim().to_string(),
        };

        let credentials = match (get(BEARER_TOKEN_VAR), get(EMAIL_VAR), get(API_TOKEN_VAR)) {
            (Some(token), _, _) => Credentials::Bearer(token),
            (None, Some(email), Some(token)) => Credentials::Basic { email, token },
            (None, None, None) => Credentials::Anonymous,
            (None, _, _) => return Err(ConfigError::IncompleteBasicAuth),
        };

        let timeout = match get(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        Ok(Self {
            site_url,
            start_date_field,
            credentials,
            timeout,
            record_path: get(RECORD_VAR).map(PathBuf::from),
        })
    }
}

fn parse_site_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSiteUrl { value: raw.to_string(), reason };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment".to_string()));
    }
    Ok(url)
}
