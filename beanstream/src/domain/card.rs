//! Payment card data.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::domain::optional_string_or_number;

/// Credit card used in a payment or stored on a profile.
///
/// The number and CVD are wiped from memory on drop and never appear in
/// `Debug` output. Cards read back from a profile carry a masked number
/// and a `card_id`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Position of the card on a profile (profiles only).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_string_or_number"
    )]
    pub card_id: Option<String>,
    /// `DEF` for the default card on a profile, `SEC` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Cardholder name.
    #[serde(default)]
    pub name: String,
    /// Card number.
    #[serde(default)]
    pub number: String,
    /// Two-digit expiry month.
    #[serde(default)]
    pub expiry_month: String,
    /// Two-digit expiry year.
    #[serde(default)]
    pub expiry_year: String,
    /// Card verification digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvd: Option<String>,
    /// Card brand as reported by the gateway (`VI`, `MC`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    /// `false` requests a pre-authorization instead of a purchase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

impl Card {
    /// Creates a card without a CVD.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        number: impl Into<String>,
        expiry_month: impl Into<String>,
        expiry_year: impl Into<String>,
    ) -> Self {
        Self {
            card_id: None,
            function: None,
            name: name.into(),
            number: number.into(),
            expiry_month: expiry_month.into(),
            expiry_year: expiry_year.into(),
            cvd: None,
            card_type: None,
            complete: None,
        }
    }

    /// Sets the card verification digits.
    #[must_use]
    pub fn with_cvd(mut self, cvd: impl Into<String>) -> Self {
        self.cvd = Some(cvd.into());
        self
    }

    /// Sets the profile card id.
    #[must_use]
    pub fn with_card_id(mut self, card_id: impl Into<String>) -> Self {
        self.card_id = Some(card_id.into());
        self
    }

    /// Returns the last four characters of the number.
    #[must_use]
    pub fn last_four(&self) -> &str {
        let start = self.number.char_indices().rev().nth(3).map_or(0, |(i, _)| i);
        &self.number[start..]
    }

    /// Returns the number with everything but the last four characters masked.
    #[must_use]
    pub fn masked_number(&self) -> String {
        let visible = self.last_four();
        let hidden = self.number.chars().count() - visible.chars().count();
        format!("{}{visible}", "*".repeat(hidden))
    }
}

impl Drop for Card {
    fn drop(&mut self) {
        self.number.zeroize();
        self.cvd.zeroize();
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("card_id", &self.card_id)
            .field("function", &self.function)
            .field("name", &self.name)
            .field("number", &self.masked_number())
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvd", &self.cvd.as_ref().map(|_| "***"))
            .field("card_type", &self.card_type)
            .field("complete", &self.complete)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visa() -> Card {
        Card::new("John Doe", "4030000010001234", "12", "25").with_cvd("123")
    }

    #[test]
    fn test_debug_redacts_number_and_cvd() {
        let debug = format!("{:?}", visa());
        assert!(debug.contains("************1234"));
        assert!(!debug.contains("4030000010001234"));
        assert!(!debug.contains("\"123\""));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_last_four() {
        assert_eq!(visa().last_four(), "1234");
        assert_eq!(Card::new("", "12", "", "").last_four(), "12");
        assert_eq!(Card::default().masked_number(), "");
    }

    #[test]
    fn test_serialize_payment_card() {
        let json = serde_json::to_value(visa()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "John Doe",
                "number": "4030000010001234",
                "expiry_month": "12",
                "expiry_year": "25",
                "cvd": "123"
            })
        );
    }

    #[test]
    fn test_deserialize_profile_card() {
        let card: Card = serde_json::from_str(
            r#"{"card_id":1,"function":"DEF","name":"John Doe","number":"403000XXXXXX1234",
                "expiry_month":"12","expiry_year":"25","card_type":"VI","extra":true}"#,
        )
        .unwrap();

        assert_eq!(card.card_id.as_deref(), Some("1"));
        assert_eq!(card.function.as_deref(), Some("DEF"));
        assert_eq!(card.card_type.as_deref(), Some("VI"));
        assert_eq!(card.last_four(), "1234");
        assert!(card.cvd.is_none());
    }
}
