use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use log::error;

use crate::ErrorResponse;

pub const INVALID_PAYLOAD: &str = "Invalid payload";
pub const TOO_MANY_REQUESTS: &str = "Too many requests";
pub const UNEXPECTED_ERROR: &str = "Unexpected error";

/// Every way a certificate request can fail.
#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{0}")]
    Upload(String),
    #[error("Request body could not be parsed")]
    MalformedPayload,
    #[error("Document generator rate limited the request")]
    UpstreamRateLimited { retry_after: Option<String> },
    #[error("Document generator responded with status {status}")]
    UpstreamFailure { status: u16 },
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<crate::pdf_generator::PdfGeneratorError> for CertificateError {
    fn from(error: crate::pdf_generator::PdfGeneratorError) -> Self {
        CertificateError::Unexpected(error.to_string())
    }
}

impl ResponseError for CertificateError {
    fn status_code(&self) -> StatusCode {
        match self {
            CertificateError::Validation(_)
            | CertificateError::Upload(_)
            | CertificateError::MalformedPayload => StatusCode::BAD_REQUEST,
            CertificateError::UpstreamRateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            CertificateError::UpstreamFailure { .. } | CertificateError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            CertificateError::Validation(messages) => {
                HttpResponse::BadRequest().json(ErrorResponse::new(messages.clone()))
            }
            CertificateError::Upload(message) => {
                HttpResponse::BadRequest().json(ErrorResponse::single(message))
            }
            CertificateError::MalformedPayload => {
                HttpResponse::BadRequest().json(ErrorResponse::single(INVALID_PAYLOAD))
            }
            CertificateError::UpstreamRateLimited { retry_after } => {
                let mut response = HttpResponse::TooManyRequests();
                if let Some(seconds) = retry_after {
                    response.insert_header((header::RETRY_AFTER, seconds.as_str()));
                }
                response.json(ErrorResponse::single(TOO_MANY_REQUESTS))
            }
            // Upstream failures are logged with their body where they are detected.
            CertificateError::UpstreamFailure { .. } => {
                HttpResponse::InternalServerError().json(ErrorResponse::single(UNEXPECTED_ERROR))
            }
            CertificateError::Unexpected(detail) => {
                error!("Failed to generate document: {}", detail);
                HttpResponse::InternalServerError().json(ErrorResponse::single(UNEXPECTED_ERROR))
            }
        }
    }
}
