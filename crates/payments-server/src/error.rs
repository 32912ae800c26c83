use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::form::FormError;

pub const UNPROCESSABLE_BODY: &str = "unprocessable entity";

/// Reasons a payment notification could not be read as form data.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("malformed form data: {0}")]
    MalformedForm(#[from] FormError),

    #[error("request body could not be read: {0}")]
    UnreadableBody(String),

    #[error("invalid content type: {0}")]
    InvalidContentType(String),
}

impl ResponseError for PaymentError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    fn error_response(&self) -> HttpResponse {
        tracing::debug!(error = %self, "rejecting payment notification");
        HttpResponse::UnprocessableEntity()
            .content_type("text/plain; charset=utf-8")
            .body(UNPROCESSABLE_BODY)
    }
}
