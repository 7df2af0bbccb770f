//! Card purchase followed by a void.
//!
//! # Running this example
//!
//! ```bash
//! export BEANSTREAM_MERCHANT_ID=300200578
//! export BEANSTREAM_PAYMENTS_API_KEY=<payments passcode>
//! cargo run --example basic_payment
//! ```

#![allow(clippy::print_stdout, reason = "examples are allowed to use println")]

use beanstream::{
    Gateway, GatewayConfig,
    domain::{Address, AdjustRequest, Card, PaymentRequest},
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let gateway = Gateway::new(GatewayConfig::from_env()?)?;

    let billing = Address {
        name: "John Doe".to_owned(),
        address_line1: "123 Fake St.".to_owned(),
        city: "Victoria".to_owned(),
        province: "BC".to_owned(),
        country: "CA".to_owned(),
        postal_code: "V8T4M3".to_owned(),
        email_address: "john.doe@example.com".to_owned(),
        ..Address::default()
    };

    let card = Card::new("John Doe", "5100000010001004", "11", "28").with_cvd("123");
    println!("Charging card {}", card.masked_number());

    let request = PaymentRequest::card(Decimal::new(1000, 2), card)
        .with_order_number(format!("demo-{}", chrono::Utc::now().timestamp()))
        .with_billing(billing);

    let payment = gateway.payments().make_payment(&request).await?;
    println!("Payment {} approved: {} ({})", payment.id, payment.is_approved(), payment.message);

    let void = gateway
        .payments()
        .void(&payment.id, &AdjustRequest::new(Decimal::new(1000, 2)))
        .await?;
    println!("Void {} approved: {}", void.id, void.is_approved());

    let transaction = gateway.payments().get_transaction(&payment.id).await?;
    println!("Transaction {} adjusted {} time(s)", transaction.id, transaction.adjusted_by.len());

    Ok(())
}
