//! Tokenization facade.

use tracing::instrument;

use crate::{
    Gateway,
    api::require_payload,
    domain::{Card, TokenResponse, token::TokenRequest},
    error::{BeanstreamError, Result},
    transport::{Command, Executer, HttpMethod},
};

/// Exchanges card details for a single-use token.
///
/// The tokenization endpoint is public: commands carry no credentials.
#[derive(Debug)]
pub struct TokensApi<'a, E> {
    gateway: &'a Gateway<E>,
}

impl<'a, E: Executer> TokensApi<'a, E> {
    pub(crate) const fn new(gateway: &'a Gateway<E>) -> Self {
        Self { gateway }
    }

    /// Tokenizes a card.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `number` if the
    /// card number is blank.
    #[instrument(skip(self, card), fields(last_four = card.last_four()))]
    pub async fn create_token(&self, card: &Card) -> Result<TokenResponse> {
        if card.number.trim().is_empty() {
            return Err(BeanstreamError::invalid_argument("number", "must not be empty"));
        }
        let body = require_payload("card", &TokenRequest::from(card))?;
        let url = self.gateway.endpoints().tokens().clone();
        let command = Command::new(HttpMethod::Post, url).with_payload(body);
        self.gateway.send(command).await
    }
}
