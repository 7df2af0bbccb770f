//! Branching on gateway errors.
//!
//! Each call below is expected to fail; the example prints how a caller
//! would recover from each kind.
//!
//! # Running this example
//!
//! ```bash
//! export BEANSTREAM_MERCHANT_ID=300200578
//! export BEANSTREAM_PAYMENTS_API_KEY=<payments passcode>
//! cargo run --example error_handling
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use beanstream::{
    BeanstreamError, Gateway, GatewayConfig, Result,
    domain::{AdjustRequest, Card, PaymentRequest, PaymentResponse},
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let gateway = Gateway::new(GatewayConfig::from_env()?)?;
    let payments = gateway.payments();

    println!("1. Blank transaction id (rejected locally)");
    report(payments.void("  ", &AdjustRequest::new(Decimal::ONE)).await);

    println!("\n2. Declined card");
    let declined = Card::new("John Doe", "4003050500040005", "11", "28").with_cvd("123");
    report(payments.make_payment(&PaymentRequest::card(Decimal::new(1000, 2), declined)).await);

    println!("\n3. Void of an unknown transaction");
    report(payments.void("1", &AdjustRequest::new(Decimal::ONE)).await);

    println!("\n4. Wrong passcode");
    let config = GatewayConfig::from_env()?.with_payments_api_key("not-a-real-key");
    let gateway = Gateway::new(config)?;
    report(gateway.payments().void("10000000", &AdjustRequest::new(Decimal::ONE)).await);

    Ok(())
}

fn report(result: Result<PaymentResponse>) {
    match result {
        Ok(response) => println!("   unexpected success: {}", response.id),

        Err(BeanstreamError::InvalidArgument { param, reason }) => {
            eprintln!("   invalid argument `{param}`: {reason}");
            eprintln!("   -> fix the input; nothing was sent");
        }

        Err(BeanstreamError::BusinessRule(api)) => {
            eprintln!("   declined: {api}");
            eprintln!("   -> ask the customer for another payment method");
        }

        Err(BeanstreamError::InvalidRequest(api)) => {
            eprintln!("   rejected request: {api}");
            for detail in &api.details {
                eprintln!("     {}: {}", detail.field, detail.message);
            }
        }

        Err(BeanstreamError::Unauthorized(api) | BeanstreamError::Forbidden(api)) => {
            eprintln!("   credentials refused: {api}");
            eprintln!("   -> check the merchant id and the key of this API family");
        }

        Err(BeanstreamError::InternalServer(api)) => {
            eprintln!("   gateway failure: {api}");
            eprintln!("   -> retry later; look the order up before charging again");
        }

        Err(e @ BeanstreamError::Communication { .. }) => {
            eprintln!("   network: {e}");
            eprintln!("   -> the outcome is unknown; query the transaction before retrying");
        }

        Err(e) => eprintln!("   other: {e}"),
    }
}
