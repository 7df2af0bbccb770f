//! Transaction search.
//!
//! A search is a date window, a row window and a list of [`Criteria`], all
//! of which must hold for a transaction to be returned.

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    domain::{lenient_datetime, optional_string_or_number},
    error::{BeanstreamError, Result},
};

/// Report name the gateway expects for transaction searches.
pub const SEARCH_REPORT_NAME: &str = "Search";

/// Date format of the search window.
const SEARCH_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Comparison applied by a [`Criteria`].
///
/// Serialized as the URL-escaped token the gateway expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Equals,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanEqual,
    /// `>=`
    GreaterThanEqual,
    /// Prefix match.
    StartWith,
}

impl Operator {
    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "%3D",
            Self::LessThan => "%3C",
            Self::GreaterThan => "%3E",
            Self::LessThanEqual => "%3C%3D",
            Self::GreaterThanEqual => "%3E%3D",
            Self::StartWith => "START%20WITH",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = BeanstreamError;

    /// Parses `=`, `<`, `>`, `<=`, `>=` or `start-with`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" | "==" | "eq" => Ok(Self::Equals),
            "<" | "lt" => Ok(Self::LessThan),
            ">" | "gt" => Ok(Self::GreaterThan),
            "<=" | "le" => Ok(Self::LessThanEqual),
            ">=" | "ge" => Ok(Self::GreaterThanEqual),
            "start-with" | "start_with" | "starts-with" => Ok(Self::StartWith),
            other => Err(BeanstreamError::invalid_argument(
                "operator",
                format!("unknown operator '{other}'"),
            )),
        }
    }
}

macro_rules! query_fields {
    ($($(#[$doc:meta])* $variant:ident = $code:literal => $name:literal,)+) => {
        /// Transaction attribute a [`Criteria`] tests.
        ///
        /// Serialized as the gateway's numeric field code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum QueryField {
            $($(#[$doc])* $variant = $code,)+
        }

        impl QueryField {
            /// Every field, in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Returns the numeric field code.
            #[must_use]
            pub const fn code(self) -> u8 {
                self as u8
            }

            /// Returns the snake-case name accepted by [`FromStr`].
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

query_fields! {
    /// Transaction id.
    TransId = 1 => "trans_id",
    /// Transaction date.
    TransDate = 2 => "trans_date",
    /// Cardholder name.
    TransCardOwner = 3 => "trans_card_owner",
    /// Customer IP address.
    TransIp = 4 => "trans_ip",
    /// Approval flag.
    TransResponse = 5 => "trans_response",
    /// Gateway message id.
    MessageId = 6 => "message_id",
    /// Masked card number.
    MaskedCard = 7 => "masked_card",
    /// Billing name.
    BillingName = 8 => "billing_name",
    /// Billing email.
    BillingEmail = 9 => "billing_email",
    /// Billing phone.
    BillingPhone = 10 => "billing_phone",
    /// Billing street line 1.
    BillingAddress1 = 11 => "billing_address1",
    /// Billing street line 2.
    BillingAddress2 = 12 => "billing_address2",
    /// Billing city.
    BillingCity = 13 => "billing_city",
    /// Billing province.
    BillingProvince = 14 => "billing_province",
    /// Billing postal code.
    BillingPostal = 15 => "billing_postal",
    /// Billing country.
    BillingCountry = 16 => "billing_country",
    /// Reference 1.
    Ref1 = 17 => "ref1",
    /// Reference 2.
    Ref2 = 18 => "ref2",
    /// Reference 3.
    Ref3 = 19 => "ref3",
    /// Reference 4.
    Ref4 = 20 => "ref4",
    /// Reference 5.
    Ref5 = 21 => "ref5",
}

impl Serialize for QueryField {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl FromStr for QueryField {
    type Err = BeanstreamError;

    /// Parses a snake-case name or a numeric code.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| {
                field.name().eq_ignore_ascii_case(s)
                    || s.parse::<u8>().is_ok_and(|code| code == field.code())
            })
            .ok_or_else(|| {
                BeanstreamError::invalid_argument("field", format!("unknown query field '{s}'"))
            })
    }
}

/// One search condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Criteria {
    /// Attribute tested.
    pub field: QueryField,
    /// Comparison.
    pub operator: Operator,
    /// Value compared against.
    pub value: String,
}

impl Criteria {
    /// Creates a condition.
    #[must_use]
    pub fn new(field: QueryField, operator: Operator, value: impl Into<String>) -> Self {
        Self { field, operator, value: value.into() }
    }
}

/// Body of a transaction search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    name: &'static str,
    #[serde(serialize_with = "serialize_search_date")]
    start_date: NaiveDateTime,
    #[serde(serialize_with = "serialize_search_date")]
    end_date: NaiveDateTime,
    start_row: u32,
    end_row: u32,
    criteria: Vec<Criteria>,
}

impl SearchQuery {
    /// Builds a search over `[start_date, end_date]` returning rows
    /// `start_row..=end_row` (one-based).
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `start_row` if it
    /// is zero, `end_row` if it precedes `start_row`, or `end_date` if it
    /// precedes `start_date`.
    pub fn new(
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
        start_row: u32,
        end_row: u32,
        criteria: Vec<Criteria>,
    ) -> Result<Self> {
        if start_row == 0 {
            return Err(BeanstreamError::invalid_argument("start_row", "rows are one-based"));
        }
        if end_row < start_row {
            return Err(BeanstreamError::invalid_argument(
                "end_row",
                format!("must not precede start_row {start_row}"),
            ));
        }
        if end_date < start_date {
            return Err(BeanstreamError::invalid_argument(
                "end_date",
                "must not precede start_date",
            ));
        }

        Ok(Self { name: SEARCH_REPORT_NAME, start_date, end_date, start_row, end_row, criteria })
    }

    /// Conditions of this search.
    #[must_use]
    pub fn criteria(&self) -> &[Criteria] {
        &self.criteria
    }
}

fn serialize_search_date<S: Serializer>(
    date: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(SEARCH_DATE_FORMAT))
}

/// Search response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchResults {
    #[serde(default)]
    pub(crate) records: Vec<TransactionRecord>,
}

/// One row of a search result.
///
/// Field names follow the gateway's report columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Position in the result set.
    #[serde(default)]
    pub row_id: u64,
    /// Transaction id.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub trn_id: Option<String>,
    /// Transaction time.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub trn_date_time: Option<NaiveDateTime>,
    /// Transaction type.
    #[serde(default)]
    pub trn_type: String,
    /// Order number.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub trn_order_number: Option<String>,
    /// Funding source.
    #[serde(default)]
    pub trn_payment_method: String,
    /// Comment.
    #[serde(default)]
    pub trn_comments: String,
    /// Masked card number.
    #[serde(default)]
    pub trn_masked_card: String,
    /// Amount.
    #[serde(default)]
    pub trn_amount: Option<Decimal>,
    /// Sum of returns.
    #[serde(default)]
    pub trn_returns: Option<Decimal>,
    /// Sum of completions.
    #[serde(default)]
    pub trn_completions: Option<Decimal>,
    /// `1` if voided.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub trn_voided: Option<String>,
    /// `1` if approved.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub trn_response: Option<String>,
    /// Card brand.
    #[serde(default)]
    pub trn_card_type: String,
    /// Settlement batch.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub trn_batch_no: Option<String>,
    /// Gateway message id.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub message_id: Option<String>,
    /// Gateway message.
    #[serde(default)]
    pub message_text: String,
    /// Cardholder name.
    #[serde(default)]
    pub trn_card_owner: String,
    /// Issuer approval code.
    #[serde(default)]
    pub trn_approval_code: String,
    /// Billing name.
    #[serde(default)]
    pub b_name: String,
    /// Billing email.
    #[serde(default)]
    pub b_email: String,
    /// Reference 1.
    #[serde(default)]
    pub ref1: String,
}
