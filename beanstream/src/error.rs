//! Error types for the Beanstream client.
//!
//! Every fallible operation in this crate returns [`Result`], whose error type
//! is [`BeanstreamError`]. The variants form a closed taxonomy that callers can
//! branch on:
//!
//! - **Local validation** ([`BeanstreamError::InvalidArgument`],
//!   [`BeanstreamError::Config`]): raised before any network I/O.
//! - **Gateway rejections** ([`BeanstreamError::Unauthorized`],
//!   [`BeanstreamError::Forbidden`], [`BeanstreamError::BusinessRule`],
//!   [`BeanstreamError::InvalidRequest`], [`BeanstreamError::InternalServer`]):
//!   the gateway answered with a non-2xx status. Each carries an [`ApiError`]
//!   with the status code and whatever the gateway put in the body.
//! - **Transport failures** ([`BeanstreamError::Communication`]): DNS,
//!   connection, TLS, timeouts, or a status the REST exchange cannot complete.
//! - **Schema mismatches** ([`BeanstreamError::UnexpectedResponse`]): a 2xx
//!   body that does not decode into the expected type.
//!
//! # Examples
//!
//! ```
//! use beanstream::error::{BeanstreamError, ErrorKind};
//!
//! let err = BeanstreamError::invalid_argument("TransId", "must not be empty");
//! assert_eq!(err.kind(), ErrorKind::InvalidArgument);
//! assert_eq!(err.status_code(), None);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, BeanstreamError>;

/// Field-level detail attached to a gateway error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Request field the gateway complained about.
    #[serde(default)]
    pub field: String,
    /// Gateway explanation for this field.
    #[serde(default)]
    pub message: String,
}

/// Error payload returned by the gateway alongside a non-2xx status.
///
/// Only `status` and `message` are guaranteed; the remaining fields are
/// filled when the gateway body is a JSON object carrying them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Gateway message code.
    pub code: Option<i32>,
    /// Gateway error category.
    pub category: Option<i32>,
    /// Human-readable message, taken from the body when present.
    pub message: String,
    /// Gateway reference for support requests.
    pub reference: Option<String>,
    /// Per-field validation details.
    pub details: Vec<ErrorDetail>,
}

impl ApiError {
    /// Creates an error payload with only a status and message.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            category: None,
            message: message.into(),
            reference: None,
            details: Vec::new(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}", self.status)?;
        if let Some(code) = self.code {
            write!(f, ", code {code}")?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// Discriminant of [`BeanstreamError`] for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument was missing or malformed.
    InvalidArgument,
    /// HTTP 401.
    Unauthorized,
    /// HTTP 403.
    Forbidden,
    /// HTTP 402 with a business-rule body.
    BusinessRule,
    /// HTTP 400, validation 402, or any other 4xx.
    InvalidRequest,
    /// Any 5xx.
    InternalServer,
    /// Transport-level failure.
    Communication,
    /// Missing or invalid client configuration.
    Config,
    /// Successful response whose body did not match the expected schema.
    UnexpectedResponse,
}

/// Errors returned by the Beanstream client.
///
/// Gateway errors are propagated to the caller exactly as the executer
/// produced them; facades never re-wrap them.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum BeanstreamError {
    /// A required argument was missing or malformed.
    ///
    /// Raised by the facades before any command is built, so no request is
    /// sent. `param` names the offending argument.
    #[error("Invalid argument `{param}`: {reason}")]
    InvalidArgument {
        /// Name of the rejected parameter.
        param: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The gateway rejected the credentials (HTTP 401).
    ///
    /// # Recovery
    ///
    /// Check the merchant id and the API key configured for the API family
    /// being called. Payments, profiles and reporting use separate keys.
    #[error("Unauthorized: {0}")]
    Unauthorized(ApiError),

    /// The credentials are valid but lack permission (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(ApiError),

    /// The request was well-formed but violates a gateway business rule (HTTP 402).
    ///
    /// Declines, duplicate transactions and over-limit returns land here.
    #[error("Business rule violation: {0}")]
    BusinessRule(ApiError),

    /// The gateway could not accept the request as sent.
    ///
    /// Covers HTTP 400, 402 responses whose body reports an input validation
    /// category, and every 4xx status without a dedicated kind.
    #[error("Invalid request: {0}")]
    InvalidRequest(ApiError),

    /// The gateway failed internally (any 5xx).
    #[error("Gateway internal error: {0}")]
    InternalServer(ApiError),

    /// The request could not be completed at the transport level.
    ///
    /// Wraps DNS, connection, TLS and timeout failures. `status` is set only
    /// when the transport produced a status outside the REST contract (1xx or
    /// an unfollowed 3xx).
    #[error("{message}")]
    Communication {
        /// Description of the failure.
        message: String,
        /// Status that ended the exchange, if any.
        status: Option<u16>,
        /// Underlying cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The client configuration is missing a value or holds an invalid one.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A successful response did not match the expected schema.
    #[error("Unexpected gateway response: {message}")]
    UnexpectedResponse {
        /// What could not be decoded.
        message: String,
        /// Decoder error, when one exists.
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl BeanstreamError {
    /// Builds an [`InvalidArgument`](Self::InvalidArgument) error.
    pub fn invalid_argument(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { param, reason: reason.into() }
    }

    /// Builds a [`Communication`](Self::Communication) error.
    pub fn communication(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Communication { message: message.into(), status: None, source }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::BusinessRule(_) => ErrorKind::BusinessRule,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::InternalServer(_) => ErrorKind::InternalServer,
            Self::Communication { .. } => ErrorKind::Communication,
            Self::Config(_) => ErrorKind::Config,
            Self::UnexpectedResponse { .. } => ErrorKind::UnexpectedResponse,
        }
    }

    /// Returns the gateway payload for errors mapped from an HTTP status.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Unauthorized(api)
            | Self::Forbidden(api)
            | Self::BusinessRule(api)
            | Self::InvalidRequest(api)
            | Self::InternalServer(api) => Some(api),
            _ => None,
        }
    }

    /// Returns the HTTP status code that produced this error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Communication { status, .. } => *status,
            other => other.api_error().map(|api| api.status),
        }
    }

    /// Returns the parameter name of an [`InvalidArgument`](Self::InvalidArgument) error.
    #[must_use]
    pub const fn param_name(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { param, .. } => Some(*param),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BeanstreamError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request to gateway timed out: {err}")
        } else if err.is_connect() {
            format!("could not connect to gateway: {err}")
        } else {
            format!("request to gateway failed: {err}")
        };
        Self::Communication {
            message,
            status: err.status().map(|s| s.as_u16()),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let error = BeanstreamError::invalid_argument("payment", "must not be null");
        assert_eq!(error.to_string(), "Invalid argument `payment`: must not be null");
        assert_eq!(error.param_name(), Some("payment"));
    }

    #[test]
    fn test_api_error_display() {
        let mut api = ApiError::new(402, "DECLINE");
        api.code = Some(7);
        assert_eq!(api.to_string(), "status 402, code 7: DECLINE");

        let bare = ApiError::new(500, "");
        assert_eq!(bare.to_string(), "status 500");
    }

    #[test]
    fn test_status_code_for_gateway_kinds() {
        let cases = [
            (BeanstreamError::Unauthorized(ApiError::new(401, "")), 401, ErrorKind::Unauthorized),
            (BeanstreamError::Forbidden(ApiError::new(403, "")), 403, ErrorKind::Forbidden),
            (
                BeanstreamError::BusinessRule(ApiError::new(402, "")),
                402,
                ErrorKind::BusinessRule,
            ),
            (
                BeanstreamError::InvalidRequest(ApiError::new(400, "")),
                400,
                ErrorKind::InvalidRequest,
            ),
            (
                BeanstreamError::InternalServer(ApiError::new(503, "")),
                503,
                ErrorKind::InternalServer,
            ),
        ];

        for (error, status, kind) in cases {
            assert_eq!(error.status_code(), Some(status));
            assert_eq!(error.kind(), kind);
            assert!(error.api_error().is_some());
        }
    }

    #[test]
    fn test_communication_message_is_display() {
        let error = BeanstreamError::communication("API exception occured", None);
        assert_eq!(error.to_string(), "API exception occured");
        assert_eq!(error.kind(), ErrorKind::Communication);
        assert_eq!(error.status_code(), None);
        assert!(error.source().is_none());
    }

    #[test]
    fn test_communication_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = BeanstreamError::communication("connect failed", Some(Box::new(io)));
        assert!(error.source().is_some_and(|s| s.to_string() == "refused"));
    }

    #[test]
    fn test_local_kinds_have_no_status() {
        assert_eq!(BeanstreamError::Config("missing key".into()).status_code(), None);
        let unexpected = BeanstreamError::UnexpectedResponse { message: "x".into(), source: None };
        assert_eq!(unexpected.kind(), ErrorKind::UnexpectedResponse);
        assert!(unexpected.api_error().is_none());
    }
}
