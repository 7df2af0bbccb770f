//! Billing and shipping addresses.

use serde::{Deserialize, Serialize};

/// Postal address attached to payments and profiles.
///
/// Empty fields are omitted from requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Name on the address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// First street line.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_line1: String,
    /// Second street line.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_line2: String,
    /// City.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    /// Two-letter province or state code.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub province: String,
    /// Two-letter ISO country code.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    /// Postal or ZIP code.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
    /// Phone number.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone_number: String,
    /// Email address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email_address: String,
}

impl Address {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
