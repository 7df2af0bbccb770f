//! Payment profiles facade.

use tracing::{info, instrument};

use crate::{
    Gateway,
    api::{require_id, require_payload},
    config::ApiFamily,
    domain::{
        Card, CreateProfileRequest, PaymentProfile, ProfileCards, ProfileResponse,
        profile::{CardBody, ProfileUpdate},
    },
    error::{BeanstreamError, Result},
    transport::{Executer, HttpMethod},
};

/// Stores customers and their cards on the gateway.
///
/// Authorized with the profiles API key. Profile ids are the
/// `customer_code` returned by [`create_profile`](Self::create_profile).
#[derive(Debug)]
pub struct ProfilesApi<'a, E> {
    gateway: &'a Gateway<E>,
}

impl<'a, E: Executer> ProfilesApi<'a, E> {
    pub(crate) const fn new(gateway: &'a Gateway<E>) -> Self {
        Self { gateway }
    }

    /// Creates a profile funded by a card or a token.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `card` unless
    /// exactly one of card or token is set.
    #[instrument(skip(self, request))]
    pub async fn create_profile(&self, request: &CreateProfileRequest) -> Result<ProfileResponse> {
        request.validate()?;
        let body = require_payload("profile", request)?;
        let url = self.gateway.endpoints().profiles()?;
        let command =
            self.gateway.command(ApiFamily::Profiles, HttpMethod::Post, url)?.with_payload(body);
        let response: ProfileResponse = self.gateway.send(command).await?;
        info!(customer_code = %response.customer_code, "profile created");
        Ok(response)
    }

    /// Fetches a profile.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `profile_id` if blank.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, profile_id: &str) -> Result<PaymentProfile> {
        let profile_id = require_id("profile_id", profile_id)?;
        let url = self.gateway.endpoints().profile(profile_id)?;
        self.send(HttpMethod::Get, url, None).await
    }

    /// Updates the billing address, reference fields, language and comment
    /// of a profile.
    ///
    /// Cards are managed with [`add_card`](Self::add_card) and friends.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `profile_id` if the
    /// profile has no customer code.
    #[instrument(skip(self, profile), fields(customer_code = %profile.customer_code))]
    pub async fn update_profile(&self, profile: &PaymentProfile) -> Result<ProfileResponse> {
        let profile_id = require_id("profile_id", &profile.customer_code)?;
        let body = require_payload("profile", &ProfileUpdate::from(profile))?;
        let url = self.gateway.endpoints().profile(profile_id)?;
        self.send(HttpMethod::Put, url, Some(body)).await
    }

    /// Deletes a profile and every card on it.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `profile_id` if blank.
    #[instrument(skip(self))]
    pub async fn delete_profile(&self, profile_id: &str) -> Result<ProfileResponse> {
        let profile_id = require_id("profile_id", profile_id)?;
        let url = self.gateway.endpoints().profile(profile_id)?;
        self.send(HttpMethod::Delete, url, None).await
    }

    /// Lists the cards on a profile.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `profile_id` if blank.
    #[instrument(skip(self))]
    pub async fn get_cards(&self, profile_id: &str) -> Result<Vec<Card>> {
        let profile_id = require_id("profile_id", profile_id)?;
        let url = self.gateway.endpoints().profile_cards(profile_id)?;
        let cards: ProfileCards = self.send(HttpMethod::Get, url, None).await?;
        Ok(cards.card)
    }

    /// Fetches one card of a profile.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] for a blank `profile_id`
    /// or `card_id`, and [`BeanstreamError::UnexpectedResponse`] if the
    /// response does not contain the card with `card_id`.
    #[instrument(skip(self))]
    pub async fn get_card(&self, profile_id: &str, card_id: &str) -> Result<Card> {
        let profile_id = require_id("profile_id", profile_id)?;
        let card_id = require_id("card_id", card_id)?;
        let url = self.gateway.endpoints().profile_card(profile_id, card_id)?;
        let cards: ProfileCards = self.send(HttpMethod::Get, url, None).await?;
        cards
            .card
            .into_iter()
            .find(|card| card.card_id.as_deref().map(str::trim) == Some(card_id))
            .ok_or_else(|| BeanstreamError::UnexpectedResponse {
                message: format!("no card {card_id} in response for profile {profile_id}"),
                source: None,
            })
    }

    /// Adds a card to a profile.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `profile_id` if blank.
    #[instrument(skip(self, card))]
    pub async fn add_card(&self, profile_id: &str, card: &Card) -> Result<ProfileResponse> {
        let profile_id = require_id("profile_id", profile_id)?;
        let body = require_payload("card", &CardBody { card })?;
        let url = self.gateway.endpoints().profile_cards(profile_id)?;
        self.send(HttpMethod::Post, url, Some(body)).await
    }

    /// Replaces the card identified by `card.card_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `profile_id` or
    /// `card_id` if either is blank.
    #[instrument(skip(self, card), fields(card_id = ?card.card_id))]
    pub async fn update_card(&self, profile_id: &str, card: &Card) -> Result<ProfileResponse> {
        let profile_id = require_id("profile_id", profile_id)?;
        let card_id = require_id("card_id", card.card_id.as_deref().unwrap_or_default())?;
        let body = require_payload("card", &CardBody { card })?;
        let url = self.gateway.endpoints().profile_card(profile_id, card_id)?;
        self.send(HttpMethod::Put, url, Some(body)).await
    }

    /// Removes a card from a profile.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `profile_id` or
    /// `card_id` if either is blank.
    #[instrument(skip(self))]
    pub async fn remove_card(&self, profile_id: &str, card_id: &str) -> Result<ProfileResponse> {
        let profile_id = require_id("profile_id", profile_id)?;
        let card_id = require_id("card_id", card_id)?;
        let url = self.gateway.endpoints().profile_card(profile_id, card_id)?;
        self.send(HttpMethod::Delete, url, None).await
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: url::Url,
        body: Option<String>,
    ) -> Result<T> {
        let mut command = self.gateway.command(ApiFamily::Profiles, method, url)?;
        if let Some(body) = body {
            command = command.with_payload(body);
        }
        self.gateway.send(command).await
    }
}
