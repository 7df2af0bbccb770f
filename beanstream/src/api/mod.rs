//! Typed facades over the gateway REST families.
//!
//! Each facade borrows a [`Gateway`](crate::Gateway) and exposes one async
//! method per gateway action. Every method follows the same sequence:
//!
//! 1. validate arguments, failing with
//!    [`InvalidArgument`](crate::BeanstreamError::InvalidArgument) before any I/O
//! 2. look up the API key for its family
//! 3. build a [`Command`](crate::transport::Command) and hand it to the executer
//! 4. decode the 2xx body into a typed response
//!
//! Executer errors are returned unchanged.

use serde::Serialize;

use crate::error::{BeanstreamError, Result};

pub mod payments;
pub mod profiles;
pub mod reporting;
pub mod tokens;

pub use payments::PaymentsApi;
pub use profiles::ProfilesApi;
pub use reporting::ReportingApi;
pub use tokens::TokensApi;

/// Returns the trimmed id, or `InvalidArgument` naming `param` if it is blank.
pub(crate) fn require_id<'a>(param: &'static str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(BeanstreamError::invalid_argument(param, "must not be empty"))
    } else {
        Ok(value)
    }
}

/// Serializes a request body, rejecting values that serialize to `null`.
pub(crate) fn require_payload<P>(param: &'static str, value: &P) -> Result<String>
where
    P: Serialize + ?Sized,
{
    let json = serde_json::to_value(value).map_err(|e| {
        BeanstreamError::invalid_argument(param, format!("cannot be serialized: {e}"))
    })?;
    if json.is_null() {
        return Err(BeanstreamError::invalid_argument(param, "must not be null"));
    }
    Ok(json.to_string())
}
