//! Gateway client root.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    api::{PaymentsApi, ProfilesApi, ReportingApi, TokensApi},
    config::{ApiFamily, GatewayConfig},
    endpoint::Endpoints,
    error::Result,
    transport::{Command, Executer, HttpExecuter, HttpMethod},
};

/// Entry point of the client.
///
/// Owns an immutable [`GatewayConfig`] and the [`Executer`] every facade
/// sends its commands through. Reconfiguring means building a new gateway.
///
/// # Examples
///
/// ```rust,no_run
/// use beanstream::{Gateway, GatewayConfig, domain::AdjustRequest};
/// use rust_decimal::Decimal;
///
/// # async fn example() -> beanstream::Result<()> {
/// let config = GatewayConfig::new(300_200_578)
///     .with_payments_api_key("4BaD82D9197b4cc4b70a221911eE9f70");
/// let gateway = Gateway::new(config)?;
///
/// let voided = gateway
///     .payments()
///     .void("10000001", &AdjustRequest::new(Decimal::new(1000, 2)))
///     .await?;
/// println!("void transaction {}", voided.transaction_id()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Gateway<E = HttpExecuter> {
    config: GatewayConfig,
    endpoints: Endpoints,
    executer: E,
}

impl Gateway<HttpExecuter> {
    /// Creates a gateway that talks HTTPS through reqwest.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`](crate::BeanstreamError::Config) if
    /// the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let executer = HttpExecuter::with_config(&config.http)?;
        Self::with_executer(config, executer)
    }
}

impl<E: Executer> Gateway<E> {
    /// Creates a gateway with a caller-supplied executer.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`](crate::BeanstreamError::Config) if
    /// the configuration is invalid.
    pub fn with_executer(config: GatewayConfig, executer: E) -> Result<Self> {
        config.validate()?;
        let endpoints = Endpoints::from_config(&config)?;
        debug!(
            merchant_id = config.merchant_id,
            api_root = %endpoints.api_root(),
            "gateway configured"
        );
        Ok(Self { config, endpoints, executer })
    }

    /// Payment processing.
    #[must_use]
    pub const fn payments(&self) -> PaymentsApi<'_, E> {
        PaymentsApi::new(self)
    }

    /// Payment profiles.
    #[must_use]
    pub const fn profiles(&self) -> ProfilesApi<'_, E> {
        ProfilesApi::new(self)
    }

    /// Transaction search and lookup.
    #[must_use]
    pub const fn reporting(&self) -> ReportingApi<'_, E> {
        ReportingApi::new(self)
    }

    /// Card tokenization.
    #[must_use]
    pub const fn tokens(&self) -> TokensApi<'_, E> {
        TokensApi::new(self)
    }

    /// Configuration this gateway was built with.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Resolved endpoint URLs.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Executer commands are sent through.
    #[must_use]
    pub const fn executer(&self) -> &E {
        &self.executer
    }

    /// Builds a command authorized with the key of `family`.
    pub(crate) fn command(
        &self,
        family: ApiFamily,
        method: HttpMethod,
        url: Url,
    ) -> Result<Command> {
        let credentials = self.config.credentials(family)?;
        Ok(Command::new(method, url).with_credentials(credentials))
    }

    /// Executes a command and decodes its body.
    pub(crate) async fn send<T: DeserializeOwned>(&self, command: Command) -> Result<T> {
        self.executer.execute(&command).await?.json()
    }
}
