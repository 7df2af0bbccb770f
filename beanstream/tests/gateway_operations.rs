//! Payments, profiles, reporting and tokenization through an injected executer.

mod common;

use beanstream::{
    ErrorKind,
    domain::{
        Address, AdjustRequest, Card, ContinuationRequest, CreateProfileRequest, Criteria,
        Operator, PaymentProfile, PaymentRequest, ProfilePayment, QueryField, Token,
    },
    transport::{CommandResult, HttpMethod},
};
use chrono::NaiveDate;
use common::{FakeExecuter, PROFILES_KEY, REPORTING_KEY, gateway};
use rust_decimal::Decimal;

const PROFILE_ID: &str = "9E2D9E6E4F0E4D4CA3C8B8F7F36E6E4F";

fn card() -> Card {
    Card::new("John Doe", "5100000010001004", "11", "28").with_cvd("123")
}

fn payload(executer: &FakeExecuter) -> serde_json::Value {
    serde_json::from_str(executer.last_command().payload().expect("command has a body"))
        .expect("body is JSON")
}

#[tokio::test]
async fn make_payment_posts_the_request() {
    let executer = FakeExecuter::responding(
        200,
        r#"{"id":"10000020","approved":"1","message":"Approved","type":"P"}"#,
    );
    let request = PaymentRequest::card(Decimal::new(1000, 2), card()).with_order_number("A-1001");

    let response = gateway(&executer).payments().make_payment(&request).await.unwrap();

    assert!(response.is_approved());
    assert_eq!(response.transaction_id().unwrap(), 10_000_020);
    let command = executer.last_command();
    assert_eq!(command.method(), HttpMethod::Post);
    assert_eq!(command.url().path(), "/api/v1/payments");
    let body = payload(&executer);
    assert_eq!(body["payment_method"], "card");
    assert_eq!(body["order_number"], "A-1001");
    assert!(body["card"].get("complete").is_none());
}

#[tokio::test]
async fn make_payment_validates_before_sending() {
    let executer = FakeExecuter::responding(200, r#"{"id":"1"}"#);

    let err = gateway(&executer)
        .payments()
        .make_payment(&PaymentRequest::cash(Decimal::ZERO))
        .await
        .unwrap_err();

    assert_eq!(err.param_name(), Some("amount"));
    assert_eq!(executer.calls(), 0);
}

#[tokio::test]
async fn pre_auth_marks_the_card_incomplete() {
    let executer = FakeExecuter::responding(200, r#"{"id":"10000021","type":"PA"}"#);

    gateway(&executer)
        .payments()
        .pre_auth(PaymentRequest::card(Decimal::new(5000, 2), card()))
        .await
        .unwrap();

    assert_eq!(payload(&executer)["card"]["complete"], false);
}

#[tokio::test]
async fn pre_auth_with_a_profile_card() {
    let executer = FakeExecuter::responding(200, r#"{"id":"10000022","type":"PA"}"#);
    let request = PaymentRequest::profile(Decimal::ONE, ProfilePayment::new(PROFILE_ID, 1));

    gateway(&executer).payments().pre_auth(request).await.unwrap();

    let body = payload(&executer);
    assert_eq!(body["payment_method"], "payment_profile");
    assert_eq!(body["payment_profile"]["customer_code"], PROFILE_ID);
    assert_eq!(body["payment_profile"]["complete"], false);
}

#[tokio::test]
async fn pre_auth_completion_posts_the_amount() {
    let executer = FakeExecuter::responding(200, r#"{"id":"10000023","type":"PAC"}"#);

    gateway(&executer)
        .payments()
        .pre_auth_completion("10000021", Decimal::new(4250, 2))
        .await
        .unwrap();

    assert_eq!(executer.last_command().url().path(), "/api/v1/payments/10000021/completions");
    assert_eq!(payload(&executer)["amount"], 42.5);
}

#[tokio::test]
async fn pre_auth_completion_rejects_non_positive_amounts() {
    let executer = FakeExecuter::responding(200, r#"{"id":"1"}"#);

    let err = gateway(&executer)
        .payments()
        .pre_auth_completion("10000021", Decimal::new(-1, 0))
        .await
        .unwrap_err();

    assert_eq!(err.param_name(), Some("amount"));
    assert_eq!(executer.calls(), 0);
}

#[tokio::test]
async fn returns_hit_the_returns_endpoint() {
    let executer = FakeExecuter::responding(200, r#"{"id":"10000024","type":"R"}"#);
    let gateway = gateway(&executer);

    gateway.payments().return_payment("10000020", &AdjustRequest::new(Decimal::ONE)).await.unwrap();
    assert_eq!(executer.last_command().url().path(), "/api/v1/payments/10000020/returns");

    let request = PaymentRequest::card(Decimal::ONE, card());
    gateway.payments().unreferenced_return(&request).await.unwrap();
    assert_eq!(executer.last_command().url().path(), "/api/v1/payments/0/returns");
}

#[tokio::test]
async fn continue_payment_posts_the_issuer_response() {
    let executer = FakeExecuter::responding(200, r#"{"id":"10000025"}"#);

    gateway(&executer)
        .payments()
        .continue_payment("6f3b0a9e", &ContinuationRequest::new("eJzVWNmy"))
        .await
        .unwrap();

    assert_eq!(executer.last_command().url().path(), "/api/v1/payments/6f3b0a9e/continue");
    assert_eq!(payload(&executer)["card_response"]["pa_res"], "eJzVWNmy");

    let err = gateway(&executer)
        .payments()
        .continue_payment(" ", &ContinuationRequest::new("x"))
        .await
        .unwrap_err();
    assert_eq!(err.param_name(), Some("merchant_data"));
}

#[tokio::test]
async fn get_transaction_decodes_adjustments() {
    let executer = FakeExecuter::responding(
        200,
        r#"{"id":10000020,"approved":"1","amount":10.00,"type":"P",
            "adjusted_by":[{"id":10000024,"type":"R","approval":1,"amount":1.00}]}"#,
    );

    let transaction = gateway(&executer).payments().get_transaction("10000020").await.unwrap();

    assert_eq!(transaction.transaction_id().unwrap(), 10_000_020);
    assert_eq!(transaction.adjusted_by.len(), 1);
    assert_eq!(executer.last_command().method(), HttpMethod::Get);
    assert!(executer.last_command().payload().is_none());
}

#[tokio::test]
async fn a_body_that_does_not_match_the_schema_is_an_unexpected_response() {
    let executer = FakeExecuter::responding(200, r#"{"approved":"1"}"#);

    let err = gateway(&executer).payments().get_transaction("10000020").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
}

#[tokio::test]
async fn profile_lifecycle_uses_the_profiles_key() {
    let executer = FakeExecuter::new(|command| {
        let body = match (command.method(), command.url().path()) {
            (HttpMethod::Get, path) if path.ends_with("/cards") => {
                r#"{"code":1,"card":[{"card_id":1,"function":"DEF","number":"510000XXXXXX1004"},
                                       {"card_id":2,"function":"SEC","number":"403000XXXXXX1234"}]}"#
            }
            (HttpMethod::Get, _) => {
                r#"{"customer_code":"9E2D9E6E4F0E4D4CA3C8B8F7F36E6E4F","status":"A",
                    "billing":{"name":"John Doe"}}"#
            }
            _ => {
                r#"{"code":1,"message":"Operation Successful",
                    "customer_code":"9E2D9E6E4F0E4D4CA3C8B8F7F36E6E4F"}"#
            }
        };
        Ok(CommandResult { status: 200, body: body.to_owned() })
    });
    let gateway = gateway(&executer);
    let profiles = gateway.profiles();

    let billing = Address { name: "John Doe".to_owned(), ..Default::default() };
    let request = CreateProfileRequest::card(card(), billing);
    let created = profiles.create_profile(&request).await.unwrap();
    assert_eq!(created.customer_code, PROFILE_ID);
    let command = executer.last_command();
    assert_eq!(command.url().path(), "/api/v1/profiles");
    assert_eq!(command.credentials().map(|c| c.api_key().expose()), Some(PROFILES_KEY));

    let mut profile = profiles.get_profile(PROFILE_ID).await.unwrap();
    assert_eq!(profile.status, "A");

    profile.comment = "vip".to_owned();
    profiles.update_profile(&profile).await.unwrap();
    let command = executer.last_command();
    assert_eq!(command.method(), HttpMethod::Put);
    assert_eq!(payload(&executer)["comment"], "vip");

    let cards = profile.get_cards(&profiles).await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[1].last_four(), "1234");

    profile.remove_card(&profiles, &cards[1]).await.unwrap();
    let command = executer.last_command();
    assert_eq!(command.method(), HttpMethod::Delete);
    assert_eq!(command.url().path(), format!("/api/v1/profiles/{PROFILE_ID}/cards/2"));

    profiles.delete_profile(PROFILE_ID).await.unwrap();
    assert_eq!(executer.last_command().url().path(), format!("/api/v1/profiles/{PROFILE_ID}"));
}

#[tokio::test]
async fn card_operations_wrap_the_card() {
    let executer = FakeExecuter::responding(200, r#"{"code":1,"message":"Operation Successful"}"#);
    let gateway = gateway(&executer);
    let profile = PaymentProfile { customer_code: PROFILE_ID.to_owned(), ..Default::default() };

    profile.add_card(&gateway.profiles(), &card()).await.unwrap();
    assert_eq!(
        executer.last_command().url().path(),
        format!("/api/v1/profiles/{PROFILE_ID}/cards")
    );
    assert_eq!(payload(&executer)["card"]["number"], "5100000010001004");

    let stored = card().with_card_id("2");
    profile.update_card(&gateway.profiles(), &stored).await.unwrap();
    assert_eq!(executer.last_command().method(), HttpMethod::Put);
    assert_eq!(
        executer.last_command().url().path(),
        format!("/api/v1/profiles/{PROFILE_ID}/cards/2")
    );
}

#[tokio::test]
async fn card_operations_require_ids() {
    let executer = FakeExecuter::responding(200, "{}");
    let gateway = gateway(&executer);
    let profile = PaymentProfile::default();

    let err = profile.get_cards(&gateway.profiles()).await.unwrap_err();
    assert_eq!(err.param_name(), Some("profile_id"));

    let err = gateway.profiles().update_card(PROFILE_ID, &card()).await.unwrap_err();
    assert_eq!(err.param_name(), Some("card_id"));

    let err = gateway.profiles().remove_card(PROFILE_ID, "").await.unwrap_err();
    assert_eq!(err.param_name(), Some("card_id"));

    let err =
        gateway.profiles().create_profile(&CreateProfileRequest::default()).await.unwrap_err();
    assert_eq!(err.param_name(), Some("card"));

    assert_eq!(executer.calls(), 0);
}

#[tokio::test]
async fn get_card_without_a_card_is_unexpected() {
    let executer = FakeExecuter::responding(200, r#"{"code":1,"card":[]}"#);

    let err = gateway(&executer).profiles().get_card(PROFILE_ID, "3").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
}

#[tokio::test]
async fn get_card_returns_the_requested_card() {
    let executer = FakeExecuter::responding(
        200,
        r#"{"code":1,"card":[{"card_id":1,"number":"510000XXXXXX1004"},
                             {"card_id":"3","number":"403000XXXXXX1234"}]}"#,
    );

    let card = gateway(&executer).profiles().get_card(PROFILE_ID, "3").await.unwrap();

    assert_eq!(card.card_id.as_deref(), Some("3"));
    assert_eq!(card.last_four(), "1234");
}

#[tokio::test]
async fn get_card_rejects_a_different_card() {
    let executer =
        FakeExecuter::responding(200, r#"{"code":1,"card":[{"card_id":1,"number":"5100"}]}"#);

    let err = gateway(&executer).profiles().get_card(PROFILE_ID, "3").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
}

#[tokio::test]
async fn query_posts_a_search_with_the_reporting_key() {
    let executer = FakeExecuter::responding(
        200,
        r#"{"records":[{"row_id":1,"trn_id":10000020,"trn_type":"P","trn_amount":10.00}]}"#,
    );
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let end = NaiveDate::from_ymd_opt(2015, 1, 31).unwrap().and_hms_opt(23, 59, 59).unwrap();

    let records = gateway(&executer)
        .reporting()
        .query(
            start,
            end,
            1,
            10,
            vec![Criteria::new(QueryField::TransId, Operator::GreaterThanEqual, "10000000")],
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].trn_id.as_deref(), Some("10000020"));
    let command = executer.last_command();
    assert_eq!(command.url().path(), "/api/v1/reports");
    assert_eq!(command.credentials().map(|c| c.api_key().expose()), Some(REPORTING_KEY));
    let body = payload(&executer);
    assert_eq!(body["name"], "Search");
    assert_eq!(body["end_date"], "2015-01-31T23:59:59");
    assert_eq!(body["criteria"][0]["operator"], "%3E%3D");
}

#[tokio::test]
async fn query_rejects_an_inverted_window() {
    let executer = FakeExecuter::responding(200, r#"{"records":[]}"#);
    let day = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();

    let err = gateway(&executer).reporting().query(day, day, 10, 1, Vec::new()).await.unwrap_err();

    assert_eq!(err.param_name(), Some("end_row"));
    assert_eq!(executer.calls(), 0);
}

#[tokio::test]
async fn reporting_get_transaction_uses_the_payments_path() {
    let executer = FakeExecuter::responding(200, r#"{"id":"10000020"}"#);

    gateway(&executer).reporting().get_transaction("10000020").await.unwrap();

    let command = executer.last_command();
    assert_eq!(command.url().path(), "/api/v1/payments/10000020");
    assert_eq!(command.credentials().map(|c| c.api_key().expose()), Some(REPORTING_KEY));
}

#[tokio::test]
async fn create_token_is_unauthenticated() {
    let executer = FakeExecuter::responding(
        200,
        r#"{"token":"gt7-0f2f20dd-777e-487e-b688-940b526172cd","code":1,"message":""}"#,
    );

    let response = gateway(&executer).tokens().create_token(&card()).await.unwrap();

    let command = executer.last_command();
    assert_eq!(command.url().as_str(), "https://www.beanstream.com/scripts/tokenization/tokens");
    assert!(command.credentials().is_none());
    assert!(payload(&executer).get("name").is_none());

    let token: Token = response.to_payment_token("John Doe");
    let request = PaymentRequest::token(Decimal::ONE, token);
    assert!(request.validate().is_ok());
}
