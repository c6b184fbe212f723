use crate::validation::{
    validate_date, validate_image_mime_type, validate_image_url, validate_length, ValidationError,
    ValidationResult,
};

use super::models::CertificateRequest;
use super::multipart_parser::CertificateUploadForm;

pub const SUBJECT_LENGTH: (usize, usize) = (3, 20);
pub const STUDENT_NAME_LENGTH: (usize, usize) = (3, 24);
pub const SIGNATURE_NAME_LENGTH: (usize, usize) = (3, 46);

/// Checks shared by both request modes, in field order.
fn base_checks(
    subject: Option<&str>,
    student_name: Option<&str>,
    date: Option<&str>,
    signature_name: Option<&str>,
) -> [Option<ValidationError>; 4] {
    [
        validate_length(subject, "subject", "Subject", SUBJECT_LENGTH.0, SUBJECT_LENGTH.1),
        validate_length(
            student_name,
            "studentName",
            "Student Name",
            STUDENT_NAME_LENGTH.0,
            STUDENT_NAME_LENGTH.1,
        ),
        validate_date(date, "date", "Date"),
        validate_length(
            signature_name,
            "signatureName",
            "Signature Name",
            SIGNATURE_NAME_LENGTH.0,
            SIGNATURE_NAME_LENGTH.1,
        ),
    ]
}

/// Validates `POST /api/certificates`.
pub fn validate_certificate_request(request: &CertificateRequest) -> ValidationResult {
    base_checks(
        request.subject.as_deref(),
        request.student_name.as_deref(),
        request.date.as_deref(),
        request.signature_name.as_deref(),
    )
    .into_iter()
    .chain(std::iter::once(validate_image_url(
        request.image.as_deref(),
        "image",
    )))
    .collect()
}

/// Validates `POST /api/certificates-with-upload`. File size is enforced earlier, while parsing.
pub fn validate_certificate_upload(form: &CertificateUploadForm) -> ValidationResult {
    base_checks(
        form.subject.as_deref(),
        form.student_name.as_deref(),
        form.date.as_deref(),
        form.signature_name.as_deref(),
    )
    .into_iter()
    .chain(std::iter::once(validate_image_mime_type(
        form.image.as_ref().map(|file| file.mime_type.as_str()),
        "image",
    )))
    .collect()
}
