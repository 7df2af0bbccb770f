//! Gateway configuration.
//!
//! [`GatewayConfig`] is an immutable value handed to [`Gateway`](crate::Gateway)
//! at construction. It can be deserialized from TOML or read from the
//! environment.
//!
//! ```toml
//! merchant_id = 300200578
//! payments_api_key = "4BaD82D9197b4cc4b70a221911eE9f70"
//! profiles_api_key = "D97D3BE1EE964A6193D17A571D9FBC80"
//! platform = "www"
//! api_version = "1"
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! ```

use std::{fmt, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    error::{BeanstreamError, Result},
    transport::Credentials,
};

/// Environment variable holding the merchant id.
pub const ENV_MERCHANT_ID: &str = "BEANSTREAM_MERCHANT_ID";
/// Environment variable holding the payments API key.
pub const ENV_PAYMENTS_API_KEY: &str = "BEANSTREAM_PAYMENTS_API_KEY";
/// Environment variable holding the profiles API key.
pub const ENV_PROFILES_API_KEY: &str = "BEANSTREAM_PROFILES_API_KEY";
/// Environment variable holding the reporting API key.
pub const ENV_REPORTING_API_KEY: &str = "BEANSTREAM_REPORTING_API_KEY";
/// Environment variable overriding the platform host prefix.
pub const ENV_PLATFORM: &str = "BEANSTREAM_PLATFORM";
/// Environment variable overriding the API version.
pub const ENV_API_VERSION: &str = "BEANSTREAM_API_VERSION";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "BEANSTREAM_BASE_URL";

/// Secret API passcode issued by the gateway.
///
/// Never printed by `Debug` and wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a raw passcode.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw passcode.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Gateway API family. Each family is authorized with its own API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    /// Payments, returns, voids and transaction lookup.
    Payments,
    /// Payment profiles and vaulted cards.
    Profiles,
    /// Transaction search.
    Reporting,
}

impl ApiFamily {
    /// Returns the lowercase family name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Payments => "payments",
            Self::Profiles => "profiles",
            Self::Reporting => "reporting",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Nine-digit merchant id.
    pub merchant_id: u32,

    /// API key for the payments family.
    #[serde(default)]
    pub payments_api_key: Option<ApiKey>,

    /// API key for the profiles family.
    #[serde(default)]
    pub profiles_api_key: Option<ApiKey>,

    /// API key for the reporting family.
    #[serde(default)]
    pub reporting_api_key: Option<ApiKey>,

    /// Host prefix of the gateway (`www` in production).
    #[serde(default = "default_platform")]
    pub platform: String,

    /// REST API version number.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Full API root overriding `platform` and `api_version`
    /// (e.g. `https://sandbox.example.com/api/v1`).
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

impl GatewayConfig {
    /// Creates a configuration with default platform, version and transport settings.
    #[must_use]
    pub fn new(merchant_id: u32) -> Self {
        Self {
            merchant_id,
            payments_api_key: None,
            profiles_api_key: None,
            reporting_api_key: None,
            platform: default_platform(),
            api_version: default_api_version(),
            base_url: None,
            http: HttpConfig::default(),
        }
    }

    /// Sets the payments API key.
    #[must_use]
    pub fn with_payments_api_key(mut self, key: impl Into<String>) -> Self {
        self.payments_api_key = Some(ApiKey::new(key));
        self
    }

    /// Sets the profiles API key.
    #[must_use]
    pub fn with_profiles_api_key(mut self, key: impl Into<String>) -> Self {
        self.profiles_api_key = Some(ApiKey::new(key));
        self
    }

    /// Sets the reporting API key.
    #[must_use]
    pub fn with_reporting_api_key(mut self, key: impl Into<String>) -> Self {
        self.reporting_api_key = Some(ApiKey::new(key));
        self
    }

    /// Sets an explicit API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`] if the document is malformed or
    /// fails [`validate`](Self::validate).
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| BeanstreamError::Config(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BeanstreamError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Builds a configuration from `BEANSTREAM_*` environment variables.
    ///
    /// `BEANSTREAM_MERCHANT_ID` is required; every other variable is optional.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`] if the merchant id is missing or not
    /// a number, or if the result fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_id = lookup(ENV_MERCHANT_ID)
            .ok_or_else(|| BeanstreamError::Config(format!("{ENV_MERCHANT_ID} is not set")))?;
        let merchant_id = raw_id.trim().parse::<u32>().map_err(|e| {
            BeanstreamError::Config(format!("{ENV_MERCHANT_ID} is not a number: {e}"))
        })?;

        let mut config = Self::new(merchant_id);
        config.payments_api_key = lookup(ENV_PAYMENTS_API_KEY).map(ApiKey::new);
        config.profiles_api_key = lookup(ENV_PROFILES_API_KEY).map(ApiKey::new);
        config.reporting_api_key = lookup(ENV_REPORTING_API_KEY).map(ApiKey::new);
        if let Some(platform) = lookup(ENV_PLATFORM) {
            config.platform = platform;
        }
        if let Some(version) = lookup(ENV_API_VERSION) {
            config.api_version = version;
        }
        config.base_url = lookup(ENV_BASE_URL);

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks that:
    /// - the merchant id is non-zero and at most nine digits
    /// - configured API keys are non-empty and contain no whitespace
    /// - `platform` is a DNS label and `api_version` is numeric
    /// - `base_url`, when set, is an absolute `http`/`https` URL
    /// - HTTP timeouts are within bounds
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.merchant_id == 0 || self.merchant_id > 999_999_999 {
            return Err(BeanstreamError::Config(format!(
                "merchant_id must have one to nine digits, got {}",
                self.merchant_id
            )));
        }

        for (family, key) in [
            (ApiFamily::Payments, &self.payments_api_key),
            (ApiFamily::Profiles, &self.profiles_api_key),
            (ApiFamily::Reporting, &self.reporting_api_key),
        ] {
            if let Some(key) = key
                && (key.expose().is_empty() || key.expose().chars().any(char::is_whitespace))
            {
                return Err(BeanstreamError::Config(format!(
                    "{family} API key must be non-empty and contain no whitespace"
                )));
            }
        }

        if self.platform.is_empty()
            || !self.platform.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(BeanstreamError::Config(format!(
                "platform must be a host label, got '{}'",
                self.platform
            )));
        }

        if self.api_version.is_empty() || !self.api_version.chars().all(|c| c.is_ascii_digit()) {
            return Err(BeanstreamError::Config(format!(
                "api_version must be numeric, got '{}'",
                self.api_version
            )));
        }

        if let Some(ref base_url) = self.base_url {
            let url = Url::parse(base_url).map_err(|e| {
                BeanstreamError::Config(format!("invalid base_url '{base_url}': {e}"))
            })?;
            if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
                return Err(BeanstreamError::Config(format!(
                    "base_url must be an absolute http(s) URL, got '{base_url}'"
                )));
            }
        }

        self.http.validate()
    }

    /// Returns the credentials for an API family.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`] if no key is configured for `family`.
    pub fn credentials(&self, family: ApiFamily) -> Result<Credentials> {
        let key = match family {
            ApiFamily::Payments => &self.payments_api_key,
            ApiFamily::Profiles => &self.profiles_api_key,
            ApiFamily::Reporting => &self.reporting_api_key,
        };
        key.as_ref()
            .map(|key| Credentials::new(self.merchant_id, key.clone()))
            .ok_or_else(|| BeanstreamError::Config(format!("no API key configured for {family}")))
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Maximum idle connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl HttpConfig {
    /// Validates timeout bounds.
    ///
    /// # Errors
    ///
    /// Returns error if timeout values are outside valid ranges:
    /// - `timeout_secs`: must be 1-300 seconds
    /// - `connect_timeout_secs`: must be 1-60 seconds
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(BeanstreamError::Config(
                "http.timeout_secs must be between 1 and 300".to_owned(),
            ));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(BeanstreamError::Config(
                "http.connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns connect timeout as Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_platform() -> String {
    "www".to_owned()
}

fn default_api_version() -> String {
    "1".to_owned()
}

fn default_pool_max_idle() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
