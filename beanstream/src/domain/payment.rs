//! Payment requests, results, and stored transactions.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        Address, Card, lenient_datetime, optional_string_or_number, string_or_number,
    },
    error::{BeanstreamError, Result},
};

/// Longest order number the gateway accepts.
pub const MAX_ORDER_NUMBER_LEN: usize = 30;

/// How a payment is funded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Raw card details in [`PaymentRequest::card`].
    #[default]
    Card,
    /// Single-use token in [`PaymentRequest::token`].
    Token,
    /// Stored profile card in [`PaymentRequest::payment_profile`].
    PaymentProfile,
    /// Cash recorded against the merchant account.
    Cash,
    /// Cheque recorded against the merchant account.
    Cheque,
}

/// Single-use token returned by the tokenization endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Cardholder name.
    pub name: String,
    /// Token value.
    pub code: String,
    /// `false` requests a pre-authorization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

impl Token {
    /// Creates a token reference.
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self { name: name.into(), code: code.into(), complete: None }
    }
}

/// Reference to a card stored on a payment profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePayment {
    /// Profile customer code.
    pub customer_code: String,
    /// One-based position of the card on the profile.
    pub card_id: u32,
    /// `false` requests a pre-authorization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

impl ProfilePayment {
    /// References card `card_id` of profile `customer_code`.
    #[must_use]
    pub fn new(customer_code: impl Into<String>, card_id: u32) -> Self {
        Self { customer_code: customer_code.into(), card_id, complete: None }
    }
}

/// Merchant-defined reference fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFields {
    /// Reference 1.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref1: String,
    /// Reference 2.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref2: String,
    /// Reference 3.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref3: String,
    /// Reference 4.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref4: String,
    /// Reference 5.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref5: String,
}

/// Purchase, pre-authorization or unreferenced return.
///
/// # Examples
///
/// ```
/// use beanstream::domain::{Card, PaymentMethod, PaymentRequest};
/// use rust_decimal::Decimal;
///
/// let card = Card::new("John Doe", "5100000010001004", "11", "28").with_cvd("123");
/// let request = PaymentRequest::card(Decimal::new(1000, 2), card).with_order_number("A-1001");
///
/// assert_eq!(request.payment_method, PaymentMethod::Card);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Merchant order number, at most 30 characters.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order_number: String,
    /// Amount in the account currency.
    pub amount: Decimal,
    /// Funding source.
    pub payment_method: PaymentMethod,
    /// Card details for [`PaymentMethod::Card`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    /// Token for [`PaymentMethod::Token`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Token>,
    /// Stored card for [`PaymentMethod::PaymentProfile`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_profile: Option<ProfilePayment>,
    /// Billing address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<Address>,
    /// Shipping address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Address>,
    /// Merchant reference fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomFields>,
    /// Free-form comment.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comments: String,
    /// Customer language (`eng` or `fre`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
    /// Customer IP address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub customer_ip: String,
    /// Return URL for 3-D Secure enrolled cards.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub term_url: String,
}

impl PaymentRequest {
    /// Card payment.
    #[must_use]
    pub fn card(amount: Decimal, card: Card) -> Self {
        Self { amount, payment_method: PaymentMethod::Card, card: Some(card), ..Self::default() }
    }

    /// Token payment.
    #[must_use]
    pub fn token(amount: Decimal, token: Token) -> Self {
        Self { amount, payment_method: PaymentMethod::Token, token: Some(token), ..Self::default() }
    }

    /// Payment with a card stored on a profile.
    #[must_use]
    pub fn profile(amount: Decimal, profile: ProfilePayment) -> Self {
        Self {
            amount,
            payment_method: PaymentMethod::PaymentProfile,
            payment_profile: Some(profile),
            ..Self::default()
        }
    }

    /// Cash payment.
    #[must_use]
    pub fn cash(amount: Decimal) -> Self {
        Self { amount, payment_method: PaymentMethod::Cash, ..Self::default() }
    }

    /// Cheque payment.
    #[must_use]
    pub fn cheque(amount: Decimal) -> Self {
        Self { amount, payment_method: PaymentMethod::Cheque, ..Self::default() }
    }

    /// Sets the order number.
    #[must_use]
    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = order_number.into();
        self
    }

    /// Sets the billing address.
    #[must_use]
    pub fn with_billing(mut self, billing: Address) -> Self {
        self.billing = Some(billing);
        self
    }

    /// Sets the shipping address.
    #[must_use]
    pub fn with_shipping(mut self, shipping: Address) -> Self {
        self.shipping = Some(shipping);
        self
    }

    /// Sets the merchant reference fields.
    #[must_use]
    pub fn with_custom(mut self, custom: CustomFields) -> Self {
        self.custom = Some(custom);
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    /// Checks the request locally.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `amount` if the
    /// amount is not positive, `order_number` if it is too long, or the
    /// funding field (`card`, `token`, `payment_profile`) missing for the
    /// selected method.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(BeanstreamError::invalid_argument("amount", "must be positive"));
        }
        if self.order_number.chars().count() > MAX_ORDER_NUMBER_LEN {
            return Err(BeanstreamError::invalid_argument(
                "order_number",
                format!("must be at most {MAX_ORDER_NUMBER_LEN} characters"),
            ));
        }

        let missing = match self.payment_method {
            PaymentMethod::Card if self.card.is_none() => Some("card"),
            PaymentMethod::Token if self.token.is_none() => Some("token"),
            PaymentMethod::PaymentProfile if self.payment_profile.is_none() => {
                Some("payment_profile")
            }
            _ => None,
        };
        match missing {
            Some(param) => Err(BeanstreamError::invalid_argument(
                param,
                "required by the selected payment method",
            )),
            None => Ok(()),
        }
    }

    /// Marks the funding source as a pre-authorization.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `payment_method`
    /// for cash and cheque payments.
    pub(crate) fn mark_pre_auth(&mut self) -> Result<()> {
        let complete = match self.payment_method {
            PaymentMethod::Card => self.card.as_mut().map(|c| &mut c.complete),
            PaymentMethod::Token => self.token.as_mut().map(|t| &mut t.complete),
            PaymentMethod::PaymentProfile => self.payment_profile.as_mut().map(|p| &mut p.complete),
            PaymentMethod::Cash | PaymentMethod::Cheque => {
                return Err(BeanstreamError::invalid_argument(
                    "payment_method",
                    "pre-authorization needs a card, token or profile",
                ));
            }
        };
        if let Some(complete) = complete {
            *complete = Some(false);
        }
        Ok(())
    }
}

/// Body for completions, returns and voids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustRequest {
    /// Amount to adjust.
    pub amount: Decimal,
    /// Order number of the adjustment.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order_number: String,
}

impl AdjustRequest {
    /// Adjusts by `amount`.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self { amount, order_number: String::new() }
    }

    /// Sets the order number.
    #[must_use]
    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = order_number.into();
        self
    }
}

/// 3-D Secure authentication result posted back to continue a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationRequest {
    /// Always `credit_card`.
    pub payment_method: String,
    /// Issuer response.
    pub card_response: CardResponse,
}

impl ContinuationRequest {
    /// Wraps the `PaRes` value returned by the issuer.
    #[must_use]
    pub fn new(pa_res: impl Into<String>) -> Self {
        Self {
            payment_method: "credit_card".to_owned(),
            card_response: CardResponse { pa_res: pa_res.into() },
        }
    }
}

/// Issuer authentication response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardResponse {
    /// Payer authentication response.
    pub pa_res: String,
}

/// Hypermedia link on a gateway response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation (`void`, `return`, `complete`).
    #[serde(default)]
    pub rel: String,
    /// Target URL.
    #[serde(default)]
    pub href: String,
    /// HTTP method.
    #[serde(default)]
    pub method: String,
}

/// Card details echoed by the gateway, never including the full number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    /// Cardholder name.
    #[serde(default)]
    pub name: String,
    /// Expiry month.
    #[serde(default)]
    pub expiry_month: String,
    /// Expiry year.
    #[serde(default)]
    pub expiry_year: String,
    /// Card brand.
    #[serde(default)]
    pub card_type: String,
    /// Last four digits.
    #[serde(default)]
    pub last_four: String,
    /// Address verification result.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub avs_result: Option<String>,
    /// CVD verification result.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub cvd_result: Option<String>,
}

/// Result of a payment or adjustment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Transaction id, sent by the gateway as a string.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// `1` when approved.
    #[serde(default, deserialize_with = "string_or_number")]
    pub approved: String,
    /// Gateway message id.
    #[serde(default, deserialize_with = "string_or_number")]
    pub message_id: String,
    /// Gateway message.
    #[serde(default)]
    pub message: String,
    /// Issuer authorization code.
    #[serde(default)]
    pub auth_code: String,
    /// Creation time.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created: Option<NaiveDateTime>,
    /// Order number.
    #[serde(default)]
    pub order_number: String,
    /// Transaction type (`P`, `PA`, `PAC`, `R`, `VP`, ...).
    #[serde(default, rename = "type")]
    pub transaction_type: String,
    /// Funding source.
    #[serde(default)]
    pub payment_method: String,
    /// Card details.
    #[serde(default)]
    pub card: Option<CardSummary>,
    /// Follow-up actions.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl PaymentResponse {
    /// Parses the transaction id.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::UnexpectedResponse`] if the id is not a
    /// non-negative integer.
    pub fn transaction_id(&self) -> Result<u64> {
        parse_transaction_id(&self.id)
    }

    /// Returns `true` if the gateway approved the transaction.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approved == "1"
    }
}

/// Adjustment recorded against a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Adjustment transaction id.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Adjustment type.
    #[serde(default, rename = "type")]
    pub adjustment_type: String,
    /// `1` when approved.
    #[serde(default, deserialize_with = "string_or_number")]
    pub approval: String,
    /// Gateway message.
    #[serde(default)]
    pub message: String,
    /// Adjusted amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Creation time.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created: Option<NaiveDateTime>,
    /// Link to the adjustment.
    #[serde(default)]
    pub url: String,
}

/// Stored transaction returned by a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// `1` when approved.
    #[serde(default, deserialize_with = "string_or_number")]
    pub approved: String,
    /// Gateway message id.
    #[serde(default, deserialize_with = "string_or_number")]
    pub message_id: String,
    /// Gateway message.
    #[serde(default)]
    pub message: String,
    /// Issuer authorization code.
    #[serde(default)]
    pub auth_code: String,
    /// Creation time.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created: Option<NaiveDateTime>,
    /// Original amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Order number.
    #[serde(default)]
    pub order_number: String,
    /// Transaction type.
    #[serde(default, rename = "type")]
    pub transaction_type: String,
    /// Comment.
    #[serde(default)]
    pub comments: String,
    /// Settlement batch.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub batch_number: Option<String>,
    /// Sum of approved returns.
    #[serde(default)]
    pub total_refunds: Option<Decimal>,
    /// Sum of approved completions.
    #[serde(default)]
    pub total_completions: Option<Decimal>,
    /// Funding source.
    #[serde(default)]
    pub payment_method: String,
    /// Card details.
    #[serde(default)]
    pub card: Option<CardSummary>,
    /// Billing address.
    #[serde(default)]
    pub billing: Option<Address>,
    /// Shipping address.
    #[serde(default)]
    pub shipping: Option<Address>,
    /// Merchant reference fields.
    #[serde(default)]
    pub custom: Option<CustomFields>,
    /// Completions, returns and voids made against this transaction.
    #[serde(default)]
    pub adjusted_by: Vec<Adjustment>,
    /// Follow-up actions.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Transaction {
    /// Parses the transaction id.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::UnexpectedResponse`] if the id is not numeric.
    pub fn transaction_id(&self) -> Result<u64> {
        parse_transaction_id(&self.id)
    }
}

fn parse_transaction_id(id: &str) -> Result<u64> {
    id.trim().parse().map_err(|_| BeanstreamError::UnexpectedResponse {
        message: format!("transaction id '{id}' is not numeric"),
        source: None,
    })
}
