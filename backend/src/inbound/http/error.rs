//! HTTP adapter mapping for domain errors.
//!
//! Errors returned through `?` in a handler render as an opaque failure
//! envelope whose transport status mirrors the envelope status. Handlers that
//! must keep a `200` transport status handle their errors explicitly instead.

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpResponse, ResponseError};

use crate::domain::{Error, TRACE_ID_HEADER};

use super::envelope::{FailureTransport, failure_response, status_for};

pub use crate::domain::ApiResult;

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = failure_response(self, FailureTransport::Escalate);
        if let Some(value) = self
            .trace_id()
            .and_then(|id| HeaderValue::from_str(id).ok())
        {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        response
    }
}

#[cfg(test)]
mod tests;
