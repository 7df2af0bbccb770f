//! Payment profiles (card vault).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    api::ProfilesApi,
    domain::{Address, Card, CustomFields, Token, lenient_datetime, optional_string_or_number},
    error::{BeanstreamError, Result},
    transport::Executer,
};

/// Customer profile stored on the gateway.
///
/// `card` holds the default card only; [`get_cards`](Self::get_cards) lists
/// every card on the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentProfile {
    /// Profile id.
    #[serde(default)]
    pub customer_code: String,
    /// Last modification time.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub modified_date: Option<NaiveDateTime>,
    /// Default card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    /// Billing address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<Address>,
    /// Merchant reference fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomFields>,
    /// Customer language.
    #[serde(default)]
    pub language: String,
    /// Profile status (`A` active, `D` disabled, `C` closed).
    #[serde(default)]
    pub status: String,
    /// Id of the last transaction made with this profile.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub last_transaction: Option<String>,
    /// Free-form comment.
    #[serde(default)]
    pub comment: String,
}

impl PaymentProfile {
    /// Lists every card on this profile.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ProfilesApi::get_cards`].
    pub async fn get_cards<E: Executer>(&self, api: &ProfilesApi<'_, E>) -> Result<Vec<Card>> {
        api.get_cards(&self.customer_code).await
    }

    /// Adds a card to this profile.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ProfilesApi::add_card`].
    pub async fn add_card<E: Executer>(
        &self,
        api: &ProfilesApi<'_, E>,
        card: &Card,
    ) -> Result<ProfileResponse> {
        api.add_card(&self.customer_code, card).await
    }

    /// Replaces the card with the same `card_id` on this profile.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ProfilesApi::update_card`].
    pub async fn update_card<E: Executer>(
        &self,
        api: &ProfilesApi<'_, E>,
        card: &Card,
    ) -> Result<ProfileResponse> {
        api.update_card(&self.customer_code, card).await
    }

    /// Removes a card from this profile.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `card_id` if the
    /// card has no id, otherwise propagates [`ProfilesApi::remove_card`].
    pub async fn remove_card<E: Executer>(
        &self,
        api: &ProfilesApi<'_, E>,
        card: &Card,
    ) -> Result<ProfileResponse> {
        let card_id = card.card_id.as_deref().unwrap_or_default();
        api.remove_card(&self.customer_code, card_id).await
    }
}

/// Outcome of a profile mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// Profile id.
    #[serde(default)]
    pub customer_code: String,
    /// Gateway result code, `1` on success.
    #[serde(default)]
    pub code: i32,
    /// Gateway message.
    #[serde(default)]
    pub message: String,
}

/// Cards stored on a profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileCards {
    /// Gateway result code.
    #[serde(default)]
    pub code: i32,
    /// Gateway message.
    #[serde(default)]
    pub message: String,
    /// Stored cards, numbers masked.
    #[serde(default)]
    pub card: Vec<Card>,
}

/// Body of a profile creation.
///
/// Exactly one of `card` or `token` funds the profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateProfileRequest {
    /// Card to store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    /// Token to store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Token>,
    /// Billing address.
    pub billing: Address,
    /// Merchant reference fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomFields>,
    /// Customer language.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    /// Free-form comment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl CreateProfileRequest {
    /// Profile funded by a card.
    #[must_use]
    pub fn card(card: Card, billing: Address) -> Self {
        Self { card: Some(card), billing, ..Self::default() }
    }

    /// Profile funded by a single-use token.
    #[must_use]
    pub fn token(token: Token, billing: Address) -> Self {
        Self { token: Some(token), billing, ..Self::default() }
    }

    /// Sets the merchant reference fields.
    #[must_use]
    pub fn with_custom(mut self, custom: CustomFields) -> Self {
        self.custom = Some(custom);
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Checks that exactly one funding source is present.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `card`.
    pub fn validate(&self) -> Result<()> {
        match (&self.card, &self.token) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(BeanstreamError::invalid_argument(
                "card",
                "exactly one of card or token is required",
            )),
        }
    }
}

/// Mutable part of a profile sent on update.
#[derive(Debug, Serialize)]
pub(crate) struct ProfileUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    billing: Option<&'a Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom: Option<&'a CustomFields>,
    #[serde(skip_serializing_if = "str::is_empty")]
    language: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    comment: &'a str,
}

impl<'a> From<&'a PaymentProfile> for ProfileUpdate<'a> {
    fn from(profile: &'a PaymentProfile) -> Self {
        Self {
            billing: profile.billing.as_ref(),
            custom: profile.custom.as_ref(),
            language: &profile.language,
            comment: &profile.comment,
        }
    }
}

/// Body wrapping one card, as expected by the card endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct CardBody<'a> {
    pub(crate) card: &'a Card,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserialization() {
        let profile: PaymentProfile = serde_json::from_str(
            r#"{
                "customer_code": "9E2D9E6E4F0E4D4CA3C8B8F7F36E6E4F",
                "modified_date": "2015-01-27T14:53:55",
                "card": {"card_id": "1", "name": "John Doe", "number": "510000XXXXXX1004",
                         "expiry_month": "11", "expiry_year": "28", "card_type": "MC"},
                "billing": {"name": "John Doe", "city": "Victoria"},
                "custom": {"ref1": "loyalty-42"},
                "language": "en",
                "status": "A",
                "last_transaction": 10000001,
                "comment": "",
                "code": 1,
                "message": "Operation Successful"
            }"#,
        )
        .unwrap();

        assert_eq!(profile.customer_code, "9E2D9E6E4F0E4D4CA3C8B8F7F36E6E4F");
        assert!(profile.modified_date.is_some());
        assert_eq!(profile.card.as_ref().map(Card::last_four), Some("1004"));
        assert_eq!(profile.custom.as_ref().map(|c| c.ref1.as_str()), Some("loyalty-42"));
        assert_eq!(profile.last_transaction.as_deref(), Some("10000001"));
    }

    #[test]
    fn test_profile_update_body() {
        let profile = PaymentProfile {
            customer_code: "ABC".to_owned(),
            billing: Some(Address { name: "Jane".to_owned(), ..Default::default() }),
            language: "fr".to_owned(),
            card: Some(Card::new("Jane", "4030000010001234", "01", "30")),
            ..Default::default()
        };

        let json = serde_json::to_value(ProfileUpdate::from(&profile)).unwrap();
        assert_eq!(json, serde_json::json!({"billing": {"name": "Jane"}, "language": "fr"}));
    }

    #[test]
    fn test_create_profile_validation() {
        let card = Card::new("Jane", "4030000010001234", "01", "30");
        let token = Token::new("Jane", "gt7-0f2f20dd-777e-487e-b688-940b526172cd");

        assert!(CreateProfileRequest::card(card.clone(), Address::default()).validate().is_ok());
        assert!(CreateProfileRequest::token(token.clone(), Address::default()).validate().is_ok());

        let neither = CreateProfileRequest::default();
        assert_eq!(neither.validate().unwrap_err().param_name(), Some("card"));

        let both = CreateProfileRequest {
            token: Some(token),
            ..CreateProfileRequest::card(card, Address::default())
        };
        assert_eq!(both.validate().unwrap_err().param_name(), Some("card"));
    }

    #[test]
    fn test_create_profile_body() {
        let request = CreateProfileRequest::token(
            Token::new("Jane", "gt7-0f2f"),
            Address { name: "Jane".to_owned(), ..Default::default() },
        )
        .with_comment("vip");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["token"]["code"], "gt7-0f2f");
        assert_eq!(json["billing"]["name"], "Jane");
        assert_eq!(json["comment"], "vip");
        assert!(json.get("card").is_none());
    }

    #[test]
    fn test_profile_cards() {
        let cards: ProfileCards = serde_json::from_str(
            r#"{"code":1,"message":"Operation Successful","card":[
                {"card_id":1,"function":"DEF","number":"403000XXXXXX1234"},
                {"card_id":2,"function":"SEC","number":"510000XXXXXX1004"}]}"#,
        )
        .unwrap();

        assert_eq!(cards.card.len(), 2);
        assert_eq!(cards.card[1].card_id.as_deref(), Some("2"));
    }
}
