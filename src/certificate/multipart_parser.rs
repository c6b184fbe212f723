use actix_multipart::{Field, Multipart};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::StreamExt;
use log::debug;

use crate::error::CertificateError;

pub const IMAGE_FIELD: &str = "image";
const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Image file buffered in memory from the `image` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    /// `data:<mimetype>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateUploadForm {
    pub subject: Option<String>,
    pub student_name: Option<String>,
    pub date: Option<String>,
    pub signature_name: Option<String>,
    pub image: Option<UploadedImage>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Image file has to be at most {0}mb")]
    FileTooLarge(u64),
    #[error("Unexpected file field: {0}")]
    UnexpectedFile(String),
    #[error("Field {0} exceeds the size limit")]
    FieldTooLarge(String),
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("Invalid UTF-8 data: {0}")]
    Utf8Error(String),
}

impl From<UploadError> for CertificateError {
    fn from(error: UploadError) -> Self {
        match error {
            UploadError::FileTooLarge(_) => CertificateError::Upload(error.to_string()),
            UploadError::Utf8Error(_) => CertificateError::MalformedPayload,
            UploadError::UnexpectedFile(_)
            | UploadError::FieldTooLarge(_)
            | UploadError::FieldError(_) => {
                CertificateError::Upload("Unexpected file error".to_string())
            }
        }
    }
}

async fn read_field(
    field: &mut Field,
    limit: usize,
    on_overflow: impl Fn() -> UploadError,
) -> Result<Vec<u8>, UploadError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.next().await {
        let data_chunk = chunk.map_err(|e| UploadError::FieldError(e.to_string()))?;
        if buffer.len() + data_chunk.len() > limit {
            return Err(on_overflow());
        }
        buffer.extend_from_slice(&data_chunk);
    }
    Ok(buffer)
}

pub struct MultipartParser;

impl MultipartParser {
    /// Parses the upload form. The single `image` file part is capped at
    /// `max_file_size_mb` while streaming, so oversize uploads never reach validation.
    pub async fn parse_certificate_multipart(
        mut multipart: Multipart,
        max_file_size_mb: u64,
    ) -> Result<CertificateUploadForm, UploadError> {
        let file_limit = (max_file_size_mb as usize).saturating_mul(1024 * 1024);
        let mut form = CertificateUploadForm::default();

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| UploadError::FieldError(e.to_string()))?;
            let (name, filename) = {
                let content_disposition = field.content_disposition().ok_or_else(|| {
                    UploadError::FieldError("Content disposition not found".to_string())
                })?;
                let name = content_disposition
                    .get_name()
                    .ok_or_else(|| UploadError::FieldError("Field name not found".to_string()))?
                    .to_string();
                (name, content_disposition.get_filename().map(str::to_string))
            };

            // Browsers submit an empty file input as a part with `filename=""`.
            if filename.as_deref() == Some("") {
                read_field(&mut field, file_limit, || {
                    UploadError::FileTooLarge(max_file_size_mb)
                })
                .await?;
                debug!("Skipping empty file part {}", name);
                continue;
            }

            if let Some(filename) = filename {
                if name != IMAGE_FIELD || form.image.is_some() {
                    return Err(UploadError::UnexpectedFile(name));
                }

                let mime_type = field
                    .content_type()
                    .map(|mime| mime.essence_str().to_string())
                    .or_else(|| mime_guess::from_path(&filename).first_raw().map(str::to_string))
                    .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

                let data = read_field(&mut field, file_limit, || {
                    UploadError::FileTooLarge(max_file_size_mb)
                })
                .await?;
                debug!(
                    "Buffered image upload {} ({}, {} bytes)",
                    filename,
                    mime_type,
                    data.len()
                );

                form.image = Some(UploadedImage { mime_type, data });
                continue;
            }

            let target = match name.as_str() {
                "subject" => &mut form.subject,
                "studentName" => &mut form.student_name,
                "date" => &mut form.date,
                "signatureName" => &mut form.signature_name,
                _ => {
                    debug!("Ignoring multipart field {}", name);
                    continue;
                }
            };
            let bytes = read_field(&mut field, MAX_TEXT_FIELD_BYTES, || {
                UploadError::FieldTooLarge(name.clone())
            })
            .await?;
            let value =
                String::from_utf8(bytes).map_err(|e| UploadError::Utf8Error(e.to_string()))?;
            *target = Some(value);
        }

        Ok(form)
    }
}
