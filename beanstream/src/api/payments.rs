//! Payments facade.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    Gateway,
    api::{require_id, require_payload},
    config::ApiFamily,
    domain::{AdjustRequest, ContinuationRequest, PaymentRequest, PaymentResponse, Transaction},
    error::{BeanstreamError, Result},
    transport::{Executer, HttpMethod},
};

/// Transaction id used by the gateway for returns without an original payment.
const UNREFERENCED_TRANS_ID: &str = "0";

/// Payment processing: purchases, pre-authorizations and adjustments.
///
/// Authorized with the payments API key.
#[derive(Debug)]
pub struct PaymentsApi<'a, E> {
    gateway: &'a Gateway<E>,
}

impl<'a, E: Executer> PaymentsApi<'a, E> {
    pub(crate) const fn new(gateway: &'a Gateway<E>) -> Self {
        Self { gateway }
    }

    /// Makes a purchase.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] if the request fails
    /// [`PaymentRequest::validate`], otherwise any gateway or transport error.
    #[instrument(
        skip(self, request),
        fields(method = ?request.payment_method, order_number = %request.order_number)
    )]
    pub async fn make_payment(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        request.validate()?;
        let body = require_payload("payment", request)?;
        self.post(self.gateway.endpoints().payments()?, body).await
    }

    /// Authorizes an amount without capturing it.
    ///
    /// Capture later with [`pre_auth_completion`](Self::pre_auth_completion).
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `payment_method` for
    /// cash and cheque, plus the errors of [`make_payment`](Self::make_payment).
    #[instrument(
        skip(self, request),
        fields(method = ?request.payment_method, order_number = %request.order_number)
    )]
    pub async fn pre_auth(&self, mut request: PaymentRequest) -> Result<PaymentResponse> {
        request.validate()?;
        request.mark_pre_auth()?;
        let body = require_payload("payment", &request)?;
        self.post(self.gateway.endpoints().payments()?, body).await
    }

    /// Captures up to `amount` of a pre-authorization.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `TransId` for a
    /// blank id or `amount` for a non-positive amount.
    #[instrument(skip(self))]
    pub async fn pre_auth_completion(
        &self,
        trans_id: &str,
        amount: Decimal,
    ) -> Result<PaymentResponse> {
        let trans_id = require_id("TransId", trans_id)?;
        if amount <= Decimal::ZERO {
            return Err(BeanstreamError::invalid_argument("amount", "must be positive"));
        }
        let body = require_payload("payment", &AdjustRequest::new(amount))?;
        self.post(self.gateway.endpoints().payment_action(trans_id, "completions")?, body).await
    }

    /// Voids a transaction made earlier the same day.
    ///
    /// `payment` is the void body, usually an [`AdjustRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `TransId` for a
    /// blank id or `payment` if it serializes to `null`. Both checks happen
    /// before anything is sent.
    #[instrument(skip(self, payment))]
    pub async fn void<P>(&self, trans_id: &str, payment: &P) -> Result<PaymentResponse>
    where
        P: Serialize + ?Sized,
    {
        let trans_id = require_id("TransId", trans_id)?;
        let body = require_payload("payment", payment)?;
        self.post(self.gateway.endpoints().payment_action(trans_id, "void")?, body).await
    }

    /// Returns funds from a settled transaction.
    ///
    /// # Errors
    ///
    /// Same argument checks as [`void`](Self::void).
    #[instrument(skip(self, payment))]
    pub async fn return_payment<P>(&self, trans_id: &str, payment: &P) -> Result<PaymentResponse>
    where
        P: Serialize + ?Sized,
    {
        let trans_id = require_id("TransId", trans_id)?;
        let body = require_payload("payment", payment)?;
        self.post(self.gateway.endpoints().payment_action(trans_id, "returns")?, body).await
    }

    /// Returns funds to a card without an original transaction.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] if the request fails
    /// [`PaymentRequest::validate`].
    #[instrument(skip(self, request), fields(order_number = %request.order_number))]
    pub async fn unreferenced_return(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        request.validate()?;
        let body = require_payload("payment", request)?;
        let url = self.gateway.endpoints().payment_action(UNREFERENCED_TRANS_ID, "returns")?;
        self.post(url, body).await
    }

    /// Completes a payment interrupted by 3-D Secure authentication.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `merchant_data`
    /// if it is blank.
    #[instrument(skip(self, merchant_data, request))]
    pub async fn continue_payment(
        &self,
        merchant_data: &str,
        request: &ContinuationRequest,
    ) -> Result<PaymentResponse> {
        let merchant_data = require_id("merchant_data", merchant_data)?;
        let body = require_payload("payment", request)?;
        self.post(self.gateway.endpoints().payment_action(merchant_data, "continue")?, body).await
    }

    /// Looks up a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`BeanstreamError::InvalidArgument`] naming `TransId` for a
    /// blank id.
    #[instrument(skip(self))]
    pub async fn get_transaction(&self, trans_id: &str) -> Result<Transaction> {
        let trans_id = require_id("TransId", trans_id)?;
        let url = self.gateway.endpoints().payment(trans_id)?;
        let command = self.gateway.command(ApiFamily::Payments, HttpMethod::Get, url)?;
        self.gateway.send(command).await
    }

    async fn post(&self, url: url::Url, body: String) -> Result<PaymentResponse> {
        let command =
            self.gateway.command(ApiFamily::Payments, HttpMethod::Post, url)?.with_payload(body);
        let response: PaymentResponse = self.gateway.send(command).await?;
        info!(trans_id = %response.id, approved = response.is_approved(), "payment processed");
        Ok(response)
    }
}
