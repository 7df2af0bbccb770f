//! Gateway URL construction.
//!
//! Every URL is derived from one API root, either
//! `https://{platform}.beanstream.com/api/v{version}` or the configured
//! `base_url`. Identifiers are appended as percent-encoded path segments, so
//! a caller-supplied id can never escape its path position.

use url::Url;

use crate::{
    config::GatewayConfig,
    error::{BeanstreamError, Result},
};

/// Path of the tokenization endpoint, relative to the API origin.
const TOKENIZATION_PATH: &str = "/scripts/tokenization/tokens";

/// Resolved gateway URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_root: Url,
    tokens: Url,
}

impl Endpoints {
    /// Resolves the API root from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`] if the resulting root is not a
    /// valid base URL.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let root = config.base_url.clone().unwrap_or_else(|| {
            format!("https://{}.beanstream.com/api/v{}", config.platform, config.api_version)
        });
        Self::from_root(&root)
    }

    /// Resolves endpoints from an explicit API root.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`] if `root` is not an absolute
    /// hierarchical URL.
    pub fn from_root(root: &str) -> Result<Self> {
        let api_root = Url::parse(root.trim_end_matches('/'))
            .map_err(|e| BeanstreamError::Config(format!("invalid API root '{root}': {e}")))?;
        if api_root.cannot_be_a_base() {
            return Err(BeanstreamError::Config(format!("API root '{root}' cannot be a base URL")));
        }

        let mut tokens = api_root.clone();
        tokens.set_path(TOKENIZATION_PATH);
        tokens.set_query(None);

        Ok(Self { api_root, tokens })
    }

    /// API root, e.g. `https://www.beanstream.com/api/v1`.
    #[must_use]
    pub const fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// `/payments`
    ///
    /// # Errors
    ///
    /// Never fails for endpoints built by [`from_root`](Self::from_root).
    pub fn payments(&self) -> Result<Url> {
        self.join(&["payments"])
    }

    /// `/payments/{trans_id}`
    ///
    /// # Errors
    ///
    /// Never fails for endpoints built by [`from_root`](Self::from_root).
    pub fn payment(&self, trans_id: &str) -> Result<Url> {
        self.join(&["payments", trans_id])
    }

    /// `/payments/{trans_id}/{action}`, where `action` is `completions`,
    /// `returns`, `void` or `continue`.
    ///
    /// # Errors
    ///
    /// Never fails for endpoints built by [`from_root`](Self::from_root).
    pub fn payment_action(&self, trans_id: &str, action: &str) -> Result<Url> {
        self.join(&["payments", trans_id, action])
    }

    /// `/profiles`
    ///
    /// # Errors
    ///
    /// Never fails for endpoints built by [`from_root`](Self::from_root).
    pub fn profiles(&self) -> Result<Url> {
        self.join(&["profiles"])
    }

    /// `/profiles/{profile_id}`
    ///
    /// # Errors
    ///
    /// Never fails for endpoints built by [`from_root`](Self::from_root).
    pub fn profile(&self, profile_id: &str) -> Result<Url> {
        self.join(&["profiles", profile_id])
    }

    /// `/profiles/{profile_id}/cards`
    ///
    /// # Errors
    ///
    /// Never fails for endpoints built by [`from_root`](Self::from_root).
    pub fn profile_cards(&self, profile_id: &str) -> Result<Url> {
        self.join(&["profiles", profile_id, "cards"])
    }

    /// `/profiles/{profile_id}/cards/{card_id}`
    ///
    /// # Errors
    ///
    /// Never fails for endpoints built by [`from_root`](Self::from_root).
    pub fn profile_card(&self, profile_id: &str, card_id: &str) -> Result<Url> {
        self.join(&["profiles", profile_id, "cards", card_id])
    }

    /// `/reports`
    ///
    /// # Errors
    ///
    /// Never fails for endpoints built by [`from_root`](Self::from_root).
    pub fn reports(&self) -> Result<Url> {
        self.join(&["reports"])
    }

    /// Tokenization endpoint. Lives outside the versioned API root.
    #[must_use]
    pub const fn tokens(&self) -> &Url {
        &self.tokens
    }

    fn join(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BeanstreamError::Config(format!(
                    "API root '{}' cannot be a base URL",
                    self.api_root
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production() -> Endpoints {
        Endpoints::from_config(&GatewayConfig::new(300_200_578)).unwrap()
    }

    #[test]
    fn test_default_root() {
        let endpoints = production();
        assert_eq!(endpoints.api_root().as_str(), "https://www.beanstream.com/api/v1");
        assert_eq!(
            endpoints.tokens().as_str(),
            "https://www.beanstream.com/scripts/tokenization/tokens"
        );
    }

    #[test]
    fn test_platform_and_version() {
        let mut config = GatewayConfig::new(300_200_578);
        config.platform = "sandbox".to_owned();
        config.api_version = "2".to_owned();

        let endpoints = Endpoints::from_config(&config).unwrap();
        assert_eq!(
            endpoints.payments().unwrap().as_str(),
            "https://sandbox.beanstream.com/api/v2/payments"
        );
    }

    #[test]
    fn test_payment_paths() {
        let endpoints = production();
        assert_eq!(endpoints.payment("10000001").unwrap().path(), "/api/v1/payments/10000001");
        assert_eq!(
            endpoints.payment_action("10000001", "void").unwrap().path(),
            "/api/v1/payments/10000001/void"
        );
        assert_eq!(
            endpoints.payment_action("0", "returns").unwrap().path(),
            "/api/v1/payments/0/returns"
        );
    }

    #[test]
    fn test_profile_paths() {
        let endpoints = production();
        assert_eq!(endpoints.profiles().unwrap().path(), "/api/v1/profiles");
        assert_eq!(
            endpoints.profile("9E2D9E6E4F0E4D4CA3C8B8F7F36E6E4F").unwrap().path(),
            "/api/v1/profiles/9E2D9E6E4F0E4D4CA3C8B8F7F36E6E4F"
        );
        assert_eq!(endpoints.profile_cards("ABC").unwrap().path(), "/api/v1/profiles/ABC/cards");
        assert_eq!(
            endpoints.profile_card("ABC", "2").unwrap().path(),
            "/api/v1/profiles/ABC/cards/2"
        );
    }

    #[test]
    fn test_reports_path() {
        assert_eq!(production().reports().unwrap().path(), "/api/v1/reports");
    }

    #[test]
    fn test_ids_are_percent_encoded() {
        let url = production().payment("../profiles/x?y").unwrap();
        assert_eq!(url.path(), "/api/v1/payments/..%2Fprofiles%2Fx%3Fy");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_base_url_override() {
        let config = GatewayConfig::new(300_200_578).with_base_url("http://127.0.0.1:8080/api/v1/");
        let endpoints = Endpoints::from_config(&config).unwrap();

        assert_eq!(endpoints.payments().unwrap().as_str(), "http://127.0.0.1:8080/api/v1/payments");
        assert_eq!(
            endpoints.tokens().as_str(),
            "http://127.0.0.1:8080/scripts/tokenization/tokens"
        );
    }

    #[test]
    fn test_invalid_root() {
        assert!(matches!(Endpoints::from_root("not a url"), Err(BeanstreamError::Config(_))));
        assert!(matches!(Endpoints::from_root("mailto:a@b.c"), Err(BeanstreamError::Config(_))));
    }
}
