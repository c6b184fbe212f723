use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::pdf_generator::CertificateTemplateData;

/// JSON body of `POST /api/certificates`. Fields stay optional so that
/// missing values surface as validation messages instead of parse errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    #[schema(example = "Rust")]
    #[serde(default)]
    pub subject: Option<String>,
    #[schema(example = "Jane Doe")]
    #[serde(default)]
    pub student_name: Option<String>,
    #[schema(example = "2024-05-01")]
    #[serde(default)]
    pub date: Option<String>,
    #[schema(example = "Ferris Crab")]
    #[serde(default)]
    pub signature_name: Option<String>,
    #[schema(example = "https://example.com/logo.png")]
    #[serde(default)]
    pub image: Option<String>,
}

/// Multipart body of `POST /api/certificates-with-upload`, for the OpenAPI document.
#[derive(Debug, ToSchema)]
#[allow(unused)]
#[schema(rename_all = "camelCase")]
pub struct CertificateUploadRequest {
    pub subject: String,
    pub student_name: String,
    pub date: String,
    pub signature_name: String,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Validated certificate data. `image` is either a URL or a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub subject: String,
    pub student_name: String,
    pub date: String,
    pub signature_name: String,
    pub image: String,
}

impl Certificate {
    /// Document name sent to the generator.
    pub fn document_name(&self) -> String {
        format!("certificate-{}-{}", self.subject, self.date)
    }

    pub fn template_data(&self) -> CertificateTemplateData {
        CertificateTemplateData {
            date: self.date.clone(),
            subject: self.subject.clone(),
            signature_name: self.signature_name.clone(),
            student_name: self.student_name.clone(),
            image: self.image.clone(),
        }
    }
}

/// Stored certificate row, without the image column.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CertificateRecord {
    pub id: i64,
    pub date: String,
    pub subject: String,
    pub signature_name: String,
    pub student_name: String,
}
