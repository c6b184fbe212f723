use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /documents/generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentOptions {
    pub template: TemplateReference,
    pub format: DocumentFormat,
    pub output: DocumentOutput,
    pub name: String,
    pub testing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateReference {
    /// Filled from configuration by the client when left empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub data: CertificateTemplateData,
}

/// Fields the certificate template is populated with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateTemplateData {
    pub date: String,
    pub subject: String,
    pub signature_name: String,
    pub student_name: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Html,
    Zip,
    Xlsx,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentOutput {
    Base64,
    Url,
    File,
}

/// Successful base64 generation response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PdfBase64Response {
    #[schema(example = "JVBERi0xLjcKJeLjz9MK...")]
    pub response: String,
    pub meta: PdfMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PdfMeta {
    #[schema(example = "certificate-Rust-2024-05-01.pdf")]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    #[schema(example = "base64")]
    pub encoding: String,
    #[serde(default, rename = "content-type")]
    #[schema(example = "application/pdf")]
    pub content_type: String,
}
