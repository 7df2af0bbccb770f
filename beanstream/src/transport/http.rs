//! HTTP executer backed by reqwest.

use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    redirect::Policy,
};
use tracing::{debug, instrument, warn};

use crate::{
    config::HttpConfig,
    error::{BeanstreamError, Result},
    transport::{Command, CommandResult, Executer, error_map},
};

/// `User-Agent` sent with every request.
const CLIENT_USER_AGENT: &str = concat!("beanstream-rs/", env!("CARGO_PKG_VERSION"));

/// Executes commands over HTTPS using reqwest.
///
/// Redirects are not followed: the gateway's REST contract never redirects a
/// JSON call, so a 3xx is surfaced as [`BeanstreamError::Communication`].
///
/// # Examples
///
/// ```
/// use beanstream::{config::HttpConfig, transport::HttpExecuter};
///
/// let config = HttpConfig { timeout_secs: 60, ..Default::default() };
/// let executer = HttpExecuter::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpExecuter {
    client: Client,
}

impl HttpExecuter {
    /// Creates an executer with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates an executer with custom transport settings.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::Config`] if the HTTP client cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .redirect(Policy::none())
            .build()
            .map_err(|e| BeanstreamError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wraps an existing reqwest client.
    ///
    /// The caller is responsible for its timeout and redirect policy.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Executer for HttpExecuter {
    #[instrument(
        name = "gateway_request",
        skip(self, command),
        fields(method = %command.method(), path = command.url().path())
    )]
    async fn execute(&self, command: &Command) -> Result<CommandResult> {
        let mut request = self
            .client
            .request(command.method().into(), command.url().clone())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT);

        if let Some(credentials) = command.credentials() {
            request = request.header(AUTHORIZATION, credentials.authorization_header());
        }

        if let Some(payload) = command.payload() {
            request = request.header(CONTENT_TYPE, "application/json").body(payload.to_owned());
        }

        let response = request.send().await.inspect_err(|e| {
            warn!(error = %e, "gateway request failed before a response");
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "gateway responded");

        error_map::into_result(status, body).inspect_err(|e| {
            warn!(status, kind = ?e.kind(), error = %e, "gateway returned an error");
        })
    }
}
