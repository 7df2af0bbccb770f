//! Card tokenization.

use serde::{Deserialize, Serialize};

use crate::domain::{Card, Token};

/// Card fields sent to the tokenization endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    number: &'a str,
    expiry_month: &'a str,
    expiry_year: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cvd: Option<&'a str>,
}

impl<'a> From<&'a Card> for TokenRequest<'a> {
    fn from(card: &'a Card) -> Self {
        Self {
            number: &card.number,
            expiry_month: &card.expiry_month,
            expiry_year: &card.expiry_year,
            cvd: card.cvd.as_deref(),
        }
    }
}

/// Single-use token issued for a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Token value, valid for one payment or profile creation.
    pub token: String,
    /// Gateway result code, `1` on success.
    #[serde(default)]
    pub code: i32,
    /// Gateway message.
    #[serde(default)]
    pub message: String,
}

impl TokenResponse {
    /// Builds a payment [`Token`] for the named cardholder.
    #[must_use]
    pub fn to_payment_token(&self, name: impl Into<String>) -> Token {
        Token::new(name, self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_request_carries_card_fields_only() {
        let card = Card::new("John Doe", "4030000010001234", "12", "25").with_cvd("123");
        let json = serde_json::to_value(TokenRequest::from(&card)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "number": "4030000010001234",
                "expiry_month": "12",
                "expiry_year": "25",
                "cvd": "123"
            })
        );
    }

    #[test]
    fn test_token_response() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"token":"gt7-0f2f20dd-777e-487e-b688-940b526172cd","code":1,"version":1,"message":""}"#,
        )
        .unwrap();
        let token = response.to_payment_token("John Doe");
        assert_eq!(token.code, "gt7-0f2f20dd-777e-487e-b688-940b526172cd");
        assert_eq!(token.name, "John Doe");
        assert!(token.complete.is_none());
    }
}
