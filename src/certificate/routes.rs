use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use log::{info, warn};

use super::models::{Certificate, CertificateRequest, CertificateUploadRequest};
use super::multipart_parser::MultipartParser;
use super::validations::{validate_certificate_request, validate_certificate_upload};
use crate::error::CertificateError;
use crate::pdf_generator::PdfBase64Response;
use crate::validation::ValidationResult;
use crate::{AppState, ErrorResponse};

fn reject(result: ValidationResult) -> CertificateError {
    let fields: Vec<&str> = result.errors().iter().map(|e| e.field).collect();
    warn!("Certificate request failed validation on {:?}", fields);
    CertificateError::Validation(result.into_messages())
}

async fn issue(state: &AppState, certificate: Certificate) -> Result<HttpResponse, CertificateError> {
    let issued = state.certificates.issue(&certificate).await?;
    match issued.record_id {
        Some(id) => info!(
            "Certificate {} issued for {} (record {})",
            issued.document_name, certificate.student_name, id
        ),
        None => info!(
            "Certificate {} issued for {}",
            issued.document_name, certificate.student_name
        ),
    }
    Ok(HttpResponse::Created()
        .content_type(ContentType::json())
        .body(issued.raw_body))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificate Service",
    post,
    path = "/certificates",
    request_body = CertificateRequest,
    responses(
        (status = 201, description = "Certificate generated", body = PdfBase64Response),
        (status = 400, description = "Validation failed or invalid payload", body = ErrorResponse),
        (status = 429, description = "Document generator rate limit, see Retry-After", body = ErrorResponse),
        (status = 500, description = "Unexpected error", body = ErrorResponse)
    )
)]
pub async fn create_certificate(
    state: web::Data<AppState>,
    body: web::Json<CertificateRequest>,
) -> Result<HttpResponse, CertificateError> {
    let request = body.into_inner();
    let validation = validate_certificate_request(&request);
    if validation.failed() {
        return Err(reject(validation));
    }

    let certificate = Certificate {
        subject: request.subject.unwrap_or_default(),
        student_name: request.student_name.unwrap_or_default(),
        date: request.date.unwrap_or_default(),
        signature_name: request.signature_name.unwrap_or_default(),
        image: request.image.unwrap_or_default(),
    };
    issue(&state, certificate).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "Certificate Service",
    post,
    path = "/certificates-with-upload",
    request_body(content = inline(CertificateUploadRequest), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Certificate generated", body = PdfBase64Response),
        (status = 400, description = "Validation failed, file too large or wrong type", body = ErrorResponse),
        (status = 429, description = "Document generator rate limit, see Retry-After", body = ErrorResponse),
        (status = 500, description = "Unexpected error", body = ErrorResponse)
    )
)]
pub async fn create_certificate_with_upload(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, CertificateError> {
    let form = MultipartParser::parse_certificate_multipart(payload, state.max_image_file_size_mb)
        .await
        .map_err(|e| {
            warn!("Rejected certificate upload: {}", e);
            CertificateError::from(e)
        })?;

    let validation = validate_certificate_upload(&form);
    if validation.failed() {
        return Err(reject(validation));
    }

    let image = form
        .image
        .as_ref()
        .map(|file| file.to_data_url())
        .ok_or_else(|| CertificateError::Unexpected("Unexpected image file error".to_string()))?;

    let certificate = Certificate {
        subject: form.subject.unwrap_or_default(),
        student_name: form.student_name.unwrap_or_default(),
        date: form.date.unwrap_or_default(),
        signature_name: form.signature_name.unwrap_or_default(),
        image,
    };
    issue(&state, certificate).await
}

/// Body parse failures are reported at the extractor, before the handler runs.
fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected certificate payload: {}", error);
    CertificateError::MalformedPayload.into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/certificates")
            .app_data(json_config())
            .route(web::post().to(create_certificate)),
    )
    .service(
        web::resource("/certificates-with-upload")
            .route(web::post().to(create_certificate_with_upload)),
    );
}
