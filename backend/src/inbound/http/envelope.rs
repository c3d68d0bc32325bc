//! Uniform JSON response envelope.
//!
//! Every account endpoint answers with `{error, statusCode, data, message}`.
//! The envelope's `statusCode` and the transport status are deliberately
//! separate: several handlers report a rejection in the envelope while the
//! transport status stays `200`.
//!
//! ```
//! use accounts::inbound::http::envelope::Envelope;
//!
//! let body = serde_json::to_value(Envelope::ok(Some(vec![1, 2]), "USERS")).unwrap();
//! assert_eq!(body["error"], false);
//! assert_eq!(body["statusCode"], 200);
//! assert_eq!(body["data"], serde_json::json!([1, 2]));
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, error::QueryPayloadError};
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

use super::validation::FieldViolation;

/// Message used for every infrastructure failure.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "INTERNAL SERVER ERROR";

/// Opaque failure detail: a stable code and the request trace id.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureDetail {
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Contents of the envelope `error` field.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ErrorField {
    /// `false` on success, `true` on a business rejection.
    Flag(bool),
    /// Field-level validation failures.
    Violations(Vec<FieldViolation>),
    /// Infrastructure, authentication, or decode failure.
    Failure(FailureDetail),
}

/// Response envelope shared by all account endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub error: ErrorField,
    pub status_code: u16,
    /// Serialized as `null` when absent.
    pub data: Option<T>,
    pub message: String,
}

/// Whether an infrastructure failure also sets the transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureTransport {
    /// Transport status mirrors the envelope (`500`/`503`).
    Escalate,
    /// Transport status stays `200`; only the envelope reports the failure.
    Suppress,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorField::Flag(false),
            status_code: StatusCode::OK.as_u16(),
            data,
            message: message.into(),
        }
    }

    /// Business rejection: `error: true`, no data.
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorField::Flag(true),
            status_code: status.as_u16(),
            data: None,
            message: message.into(),
        }
    }

    /// Validation rejection carrying every violation found.
    pub fn invalid(violations: Vec<FieldViolation>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorField::Violations(violations),
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            data: None,
            message: message.into(),
        }
    }

    /// Opaque failure envelope for a domain error.
    ///
    /// Server faults never expose their message; it is logged instead.
    pub fn failure(error: &Error) -> Self {
        let message = if error.code().is_server_fault() {
            INTERNAL_SERVER_ERROR_MESSAGE.to_owned()
        } else {
            error.message().to_owned()
        };
        Self {
            error: ErrorField::Failure(FailureDetail {
                code: error.code(),
                trace_id: error.trace_id().map(str::to_owned),
            }),
            status_code: status_for(error.code()).as_u16(),
            data: None,
            message,
        }
    }

    /// Serialize with the given transport status.
    pub fn respond(&self, transport: StatusCode) -> HttpResponse {
        HttpResponse::build(transport).json(self)
    }
}

/// Payload type of envelopes whose `data` is always `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct NoData {}

/// Transport status matching an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a failed use-case call under the handler's transport policy.
pub fn failure_response(error: &Error, transport: FailureTransport) -> HttpResponse {
    if error.code().is_server_fault() {
        error!(
            code = ?error.code(),
            trace_id = error.trace_id().unwrap_or("-"),
            detail = error.message(),
            "request failed"
        );
    }
    let envelope = Envelope::<NoData>::failure(error);
    let status = match transport {
        FailureTransport::Escalate => status_for(error.code()),
        FailureTransport::Suppress => StatusCode::OK,
    };
    envelope.respond(status)
}

/// `JsonConfig` error handler producing an `invalid_request` envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting malformed JSON body");
    Error::invalid_request("malformed JSON body").into()
}

/// `QueryConfig` error handler producing an `invalid_request` envelope.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting malformed query string");
    Error::invalid_request("malformed query string").into()
}
