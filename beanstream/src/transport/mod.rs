//! Command execution layer.
//!
//! A facade describes one gateway call as a [`Command`] and hands it to an
//! [`Executer`]. The executer performs the exchange and returns either a
//! [`CommandResult`] with a 2xx status or exactly one typed
//! [`BeanstreamError`](crate::BeanstreamError).
//!
//! [`HttpExecuter`] is the production implementation. Tests and callers with
//! their own transport implement [`Executer`] and inject it through
//! [`Gateway::with_executer`](crate::Gateway::with_executer).
//!
//! # Examples
//!
//! ```rust,no_run
//! use beanstream::transport::{Command, Credentials, Executer, HttpExecuter, HttpMethod};
//! use url::Url;
//!
//! # async fn example() -> beanstream::Result<()> {
//! let executer = HttpExecuter::new()?;
//! let url = Url::parse("https://www.beanstream.com/api/v1/payments/10000001").unwrap();
//! let command = Command::new(HttpMethod::Get, url)
//!     .with_credentials(Credentials::new(300_200_578, "4BaD82D9197b4cc4b70a221911eE9f70"));
//!
//! let result = executer.execute(&command).await?;
//! println!("{}: {}", result.status, result.body);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::{fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    config::ApiKey,
    error::{BeanstreamError, Result},
};

pub mod error_map;
pub mod http;

pub use http::HttpExecuter;

/// HTTP verb of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the verb as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Merchant id and API key used to authorize a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    merchant_id: u32,
    api_key: ApiKey,
}

impl Credentials {
    /// Creates credentials for a merchant.
    #[must_use]
    pub fn new(merchant_id: u32, api_key: impl Into<ApiKey>) -> Self {
        Self { merchant_id, api_key: api_key.into() }
    }

    /// Returns the merchant id.
    #[must_use]
    pub const fn merchant_id(&self) -> u32 {
        self.merchant_id
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the `Authorization` header value:
    /// `Passcode base64("{merchant_id}:{api_key}")`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let raw = format!("{}:{}", self.merchant_id, self.api_key.expose());
        format!("Passcode {}", STANDARD.encode(raw))
    }
}

/// One pending gateway request.
///
/// Built once by a facade and never modified afterwards; the builder methods
/// consume `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    method: HttpMethod,
    url: Url,
    payload: Option<String>,
    credentials: Option<Credentials>,
}

impl Command {
    /// Creates an unauthenticated command without a body.
    #[must_use]
    pub const fn new(method: HttpMethod, url: Url) -> Self {
        Self { method, url, payload: None, credentials: None }
    }

    /// Attaches a serialized JSON body.
    #[must_use]
    pub fn with_payload(mut self, json: impl Into<String>) -> Self {
        self.payload = Some(json.into());
        self
    }

    /// Attaches credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// HTTP verb.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Target URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Serialized JSON body, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Credentials, if the command is authenticated.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}

/// Raw outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// HTTP status code, always 2xx.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl CommandResult {
    /// Decodes the body as JSON.
    ///
    /// Unknown fields are ignored by the domain types.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::UnexpectedResponse`] if the body does not
    /// match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| BeanstreamError::UnexpectedResponse {
            message: format!(
                "cannot decode {} from {} response: {e}",
                std::any::type_name::<T>(),
                self.status
            ),
            source: Some(e),
        })
    }
}

/// Capability that performs a [`Command`] against the gateway.
///
/// Implementations must uphold the exchange contract:
/// - a 2xx response yields `Ok(CommandResult)`
/// - any other status yields exactly one error chosen by
///   [`error_map::into_result`]
/// - a transport failure yields [`BeanstreamError::Communication`]
///
/// # Examples
///
/// A canned executer for tests:
///
/// ```
/// use beanstream::{
///     Result,
///     transport::{Command, CommandResult, Executer},
/// };
///
/// struct Canned(&'static str);
///
/// impl Executer for Canned {
///     async fn execute(&self, _command: &Command) -> Result<CommandResult> {
///         Ok(CommandResult { status: 200, body: self.0.to_owned() })
///     }
/// }
/// ```
pub trait Executer: Send + Sync {
    /// Executes one command.
    ///
    /// # Errors
    ///
    /// Returns the typed error mapped from a non-2xx status, or
    /// [`BeanstreamError::Communication`] on transport failure.
    fn execute(&self, command: &Command) -> impl Future<Output = Result<CommandResult>> + Send;
}

impl<E: Executer> Executer for Arc<E> {
    fn execute(&self, command: &Command) -> impl Future<Output = Result<CommandResult>> + Send {
        (**self).execute(command)
    }
}

impl<E: Executer> Executer for &E {
    fn execute(&self, command: &Command) -> impl Future<Output = Result<CommandResult>> + Send {
        (**self).execute(command)
    }
}
