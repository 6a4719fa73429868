//! Tests for error construction, trace capture and payload decoding.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_offer("x"), ErrorCode::InvalidOffer)]
#[case(Error::invalid_status("x"), ErrorCode::InvalidStatus)]
#[case(Error::self_offer_denied("x"), ErrorCode::SelfOfferDenied)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let error = Error::self_offer_denied("cannot offer on your own item");
    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(
        value,
        json!({
            "code": "self_offer_denied",
            "message": "cannot offer on your own item",
        })
    );
}

#[rstest]
fn round_trips_trace_id_and_details(expected_trace_id: String) {
    let error = Error::conflict("offer already resolved")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "status": "accepted" }));
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value.get("traceId").and_then(serde_json::Value::as_str),
        Some(expected_trace_id.as_str())
    );

    let decoded: Error = serde_json::from_value(value).expect("decode error");
    assert_eq!(decoded, error);
}

#[rstest]
fn decoding_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({
        "code": "not_found",
        "message": "   ",
    }));
    assert!(result.is_err());
}
