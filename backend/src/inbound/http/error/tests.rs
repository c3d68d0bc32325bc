//! Tests for HTTP error mapping.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{Error, TRACE_ID_HEADER};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("envelope JSON");
    (status, header, body)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[actix_web::test]
async fn unauthorized_renders_login_required_envelope() {
    let error = Error::unauthorized("login required").with_trace_id(TRACE_ID);
    let (status, header, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({
            "error": { "code": "unauthorized", "traceId": TRACE_ID },
            "statusCode": 401,
            "data": null,
            "message": "login required",
        })
    );
}

#[actix_web::test]
async fn internal_errors_hide_details() {
    let error = Error::internal("duplicate key in users_pkey")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }));
    let (status, _, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("INTERNAL SERVER ERROR"));
    assert_eq!(body["error"]["code"], json!("internal_error"));
    assert!(!body.to_string().contains("users_pkey"));
    assert!(!body.to_string().contains("secret"));
}

#[actix_web::test]
async fn missing_trace_id_omits_header() {
    let (_, header, body) = body_of(&Error::invalid_request("malformed JSON body")).await;
    assert!(header.is_none());
    assert!(body["error"].get("traceId").is_none());
}
