//! Typed request and response schemas.
//!
//! Response types ignore unknown fields, and every field except an
//! identifier defaults when absent, so additive gateway changes do not break
//! decoding.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub mod address;
pub mod card;
pub mod payment;
pub mod profile;
pub mod report;
pub mod token;

pub use address::Address;
pub use card::Card;
pub use payment::{
    AdjustRequest, Adjustment, CardSummary, ContinuationRequest, CustomFields, Link,
    PaymentMethod, PaymentRequest, PaymentResponse, ProfilePayment, Token, Transaction,
};
pub use profile::{CreateProfileRequest, PaymentProfile, ProfileCards, ProfileResponse};
pub use report::{Criteria, Operator, QueryField, SearchQuery, TransactionRecord};
pub use token::TokenResponse;

/// Scalar the gateway sends either as a JSON string or a JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Flag(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Signed(n) => n.to_string(),
            Self::Unsigned(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Flag(b) => u8::from(b).to_string(),
        }
    }
}

/// Deserializes a string or number into a `String`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_string)
}

/// Like [`string_or_number`], for optional fields. `null` becomes `None`.
pub(crate) fn optional_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// Deserializes a gateway timestamp.
///
/// Accepts RFC 3339 and the offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` form.
/// Anything else decodes as `None`.
pub(crate) fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_datetime(&s)))
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "optional_string_or_number")]
        card_id: Option<String>,
        #[serde(default, deserialize_with = "lenient_datetime")]
        at: Option<NaiveDateTime>,
    }

    #[test]
    fn test_string_or_number() {
        let text: Probe = serde_json::from_str(r#"{"id":"10000000"}"#).unwrap();
        let number: Probe = serde_json::from_str(r#"{"id":10000000}"#).unwrap();
        assert_eq!(text.id, "10000000");
        assert_eq!(number.id, "10000000");
    }

    #[test]
    fn test_optional_string_or_number() {
        let missing: Probe = serde_json::from_str(r#"{"id":1}"#).unwrap();
        let null: Probe = serde_json::from_str(r#"{"id":1,"card_id":null}"#).unwrap();
        let number: Probe = serde_json::from_str(r#"{"id":1,"card_id":2}"#).unwrap();
        assert_eq!(missing.card_id, None);
        assert_eq!(null.card_id, None);
        assert_eq!(number.card_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_lenient_datetime_formats() {
        let expected =
            NaiveDate::from_ymd_opt(2014, 11, 25).unwrap().and_hms_opt(11, 2, 31).unwrap();

        for raw in ["2014-11-25T11:02:31", "2014-11-25T11:02:31Z", "2014-11-25 11:02:31"] {
            let probe: Probe =
                serde_json::from_str(&format!(r#"{{"id":1,"at":"{raw}"}}"#)).unwrap();
            assert_eq!(probe.at, Some(expected), "format {raw}");
        }

        let fractional: Probe =
            serde_json::from_str(r#"{"id":1,"at":"2014-11-25T11:02:31.613"}"#).unwrap();
        assert_eq!(fractional.at.map(|dt| dt.second()), Some(31));
    }

    #[test]
    fn test_lenient_datetime_garbage_is_none() {
        let probe: Probe = serde_json::from_str(r#"{"id":1,"at":"yesterday"}"#).unwrap();
        assert!(probe.at.is_none());
    }
}
