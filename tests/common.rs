#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use certificate_generator_server::certificate::service::{CertificateService, CertificateStore};
use certificate_generator_server::pdf_generator::{
    DocumentGenerator, DocumentOptions, GeneratorResponse, PdfGeneratorError,
};
use certificate_generator_server::AppState;
use serde_json::json;

pub const BOUNDARY: &str = "certificate-test-boundary";

/// Mock implementation of DocumentGenerator for testing
pub struct MockDocumentGenerator {
    response: Option<GeneratorResponse>,
    calls: Mutex<Vec<DocumentOptions>>,
}

impl MockDocumentGenerator {
    pub fn with_response(status: u16, retry_after: Option<&str>, body: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            response: Some(GeneratorResponse {
                status,
                retry_after: retry_after.map(str::to_string),
                body,
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Responds 201 with a base64 PDF body.
    pub fn succeeding() -> Arc<Self> {
        Self::with_response(201, None, pdf_response_body())
    }

    /// Fails before any response is received.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<DocumentOptions> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DocumentGenerator for MockDocumentGenerator {
    async fn generate_document(
        &self,
        options: DocumentOptions,
    ) -> Result<GeneratorResponse, PdfGeneratorError> {
        self.calls.lock().unwrap().push(options);
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(PdfGeneratorError::Token(
                jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into(),
            )),
        }
    }
}

pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n%test certificate\n";

pub fn pdf_response_body() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "response": STANDARD.encode(PDF_BYTES),
        "meta": {
            "name": "certificate-Rust-2024-05-01.pdf",
            "display_name": "certificate-Rust-2024-05-01",
            "encoding": "base64",
            "content-type": "application/pdf"
        }
    }))
    .unwrap()
}

pub fn test_state(
    generator: Arc<MockDocumentGenerator>,
    store: Option<Arc<dyn CertificateStore>>,
    max_image_file_size_mb: u64,
) -> AppState {
    AppState::new_with_service(
        CertificateService::new(generator, store),
        max_image_file_size_mb,
    )
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

/// Builds a `multipart/form-data` body delimited by [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn valid_text_parts() -> Vec<Part<'static>> {
    vec![
        Part::Text("subject", "Rust"),
        Part::Text("studentName", "Jane Doe"),
        Part::Text("date", "2024-05-01"),
        Part::Text("signatureName", "Ferris Crab"),
    ]
}
