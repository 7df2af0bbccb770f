//! HTTP status to error-kind mapping.
//!
//! | Status | Kind |
//! |--------|------|
//! | 2xx | success, no error |
//! | 400 | [`InvalidRequest`](BeanstreamError::InvalidRequest) |
//! | 401 | [`Unauthorized`](BeanstreamError::Unauthorized) |
//! | 402, body category 3 | [`InvalidRequest`](BeanstreamError::InvalidRequest) |
//! | 402, any other body | [`BusinessRule`](BeanstreamError::BusinessRule) |
//! | 403 | [`Forbidden`](BeanstreamError::Forbidden) |
//! | other 4xx | [`InvalidRequest`](BeanstreamError::InvalidRequest) |
//! | 5xx | [`InternalServer`](BeanstreamError::InternalServer) |
//! | 1xx, 3xx, out of range | [`Communication`](BeanstreamError::Communication) with the status |

use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::{
    error::{ApiError, BeanstreamError, ErrorDetail, Result},
    transport::CommandResult,
};

/// Gateway error category reporting an input validation failure.
pub const CATEGORY_INPUT_VALIDATION: i32 = 3;

/// Longest non-JSON body kept as an error message.
const MAX_RAW_MESSAGE_CHARS: usize = 512;

/// Turns a completed exchange into a result.
///
/// A 2xx status yields the [`CommandResult`]; every other status yields
/// exactly one error.
///
/// # Errors
///
/// Returns the error kind selected by the table in the module docs.
pub fn into_result(status: u16, body: String) -> Result<CommandResult> {
    if (200..300).contains(&status) {
        Ok(CommandResult { status, body })
    } else {
        Err(map_error(status, &body))
    }
}

/// Maps a non-2xx status and its body to an error.
fn map_error(status: u16, body: &str) -> BeanstreamError {
    if !(400..600).contains(&status) {
        return BeanstreamError::Communication {
            message: format!("gateway exchange ended with unexpected status {status}"),
            status: Some(status),
            source: None,
        };
    }

    let api = parse_error_body(status, body);
    match status {
        401 => BeanstreamError::Unauthorized(api),
        403 => BeanstreamError::Forbidden(api),
        402 if api.category == Some(CATEGORY_INPUT_VALIDATION) => {
            BeanstreamError::InvalidRequest(api)
        }
        402 => BeanstreamError::BusinessRule(api),
        400..500 => BeanstreamError::InvalidRequest(api),
        _ => BeanstreamError::InternalServer(api),
    }
}

/// Extracts the gateway error payload from a response body.
///
/// A JSON object contributes its `code`, `category`, `message`, `reference`
/// and `details` fields. Any other non-empty body becomes the message,
/// truncated. An empty body falls back to the status reason phrase.
#[must_use]
pub fn parse_error_body(status: u16, body: &str) -> ApiError {
    let trimmed = body.trim();
    let object = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    };

    let reason = || {
        StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown status")
            .to_owned()
    };

    match object {
        Some(map) => ApiError {
            status,
            code: int_field(&map, "code"),
            category: int_field(&map, "category"),
            message: text_field(&map, "message").unwrap_or_else(reason),
            reference: text_field(&map, "reference"),
            details: details_field(&map),
        },
        None if trimmed.is_empty() => ApiError::new(status, reason()),
        None => ApiError::new(
            status,
            trimmed.chars().take(MAX_RAW_MESSAGE_CHARS).collect::<String>(),
        ),
    }
}

// Each field is read on its own so one oddly typed value cannot hide the others.

fn int_field(map: &Map<String, Value>, key: &str) -> Option<i32> {
    match map.get(key)? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn details_field(map: &Map<String, Value>) -> Vec<ErrorDetail> {
    let Some(Value::Array(entries)) = map.get("details") else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| ErrorDetail {
            field: text_field(entry, "field").unwrap_or_default(),
            message: text_field(entry, "message").unwrap_or_default(),
        })
        .collect()
}
