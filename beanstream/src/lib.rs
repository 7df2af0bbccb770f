//! Beanstream: async client for the Beanstream payment gateway REST API.
//!
//! The crate wraps the gateway's payments, profiles, reporting and
//! tokenization endpoints behind typed requests and responses, and maps
//! every HTTP outcome to exactly one typed error.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Gateway<E>  (GatewayConfig + Endpoints + E)  │
//! │  payments() profiles() reporting() tokens()  │
//! └────────┬─────────────────────────────────────┘
//!          │ validate args, build Command
//! ┌────────▼────────┐
//! │  E: Executer    │  HttpExecuter (reqwest) or a test double
//! └────────┬────────┘
//!          │ status + body
//! ┌────────▼────────┐
//! │  error_map      │  2xx → CommandResult, else one BeanstreamError
//! └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use beanstream::{
//!     Gateway, GatewayConfig,
//!     domain::{Card, PaymentRequest},
//! };
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> beanstream::Result<()> {
//! let config = GatewayConfig::new(300_200_578)
//!     .with_payments_api_key("4BaD82D9197b4cc4b70a221911eE9f70");
//! let gateway = Gateway::new(config)?;
//!
//! let card = Card::new("John Doe", "5100000010001004", "11", "28").with_cvd("123");
//! let request = PaymentRequest::card(Decimal::new(1000, 2), card).with_order_number("A-1001");
//!
//! let response = gateway.payments().make_payment(&request).await?;
//! println!("transaction {} approved: {}", response.transaction_id()?, response.is_approved());
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Branch on the variant, or on [`BeanstreamError::kind`] when only the
//! category matters:
//!
//! ```rust,no_run
//! use beanstream::{BeanstreamError, Gateway, GatewayConfig, domain::AdjustRequest};
//! use rust_decimal::Decimal;
//!
//! # async fn example(gateway: Gateway) {
//! match gateway.payments().void("10000001", &AdjustRequest::new(Decimal::ONE)).await {
//!     Ok(voided) => println!("voided as {}", voided.id),
//!     Err(BeanstreamError::BusinessRule(api)) => eprintln!("declined: {}", api.message),
//!     Err(BeanstreamError::Unauthorized(_)) => eprintln!("check the payments API key"),
//!     Err(e @ BeanstreamError::Communication { .. }) => eprintln!("network: {e}"),
//!     Err(e) => eprintln!("failed: {e}"),
//! }
//! # }
//! ```
//!
//! # Testing
//!
//! [`Gateway::with_executer`] accepts any [`transport::Executer`], so tests can
//! answer commands without a network.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod config;
pub mod domain;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod transport;

pub use config::GatewayConfig;
pub use error::{BeanstreamError, ErrorKind, Result};
pub use gateway::Gateway;
