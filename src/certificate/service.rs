//! Certificate orchestration: document generation followed by best-effort bookkeeping.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};

use super::models::Certificate;
use crate::error::CertificateError;
use crate::pdf_generator::{
    DocumentFormat, DocumentGenerator, DocumentOptions, DocumentOutput, GeneratorResponse,
    PdfGeneratorError, TemplateReference,
};

/// Where issued certificates are recorded.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Inserts one row and returns its id.
    async fn insert_certificate(&self, certificate: &Certificate) -> Result<i64, sqlx::Error>;
}

/// A generated document together with the untouched generator body.
#[derive(Debug, Clone)]
pub struct IssuedCertificate {
    pub document_name: String,
    pub raw_body: Vec<u8>,
    pub record_id: Option<i64>,
}

#[derive(Clone)]
pub struct CertificateService {
    generator: Arc<dyn DocumentGenerator>,
    store: Option<Arc<dyn CertificateStore>>,
}

impl CertificateService {
    pub fn new(
        generator: Arc<dyn DocumentGenerator>,
        store: Option<Arc<dyn CertificateStore>>,
    ) -> Self {
        Self { generator, store }
    }

    /// Calls the generator with the certificate mapped onto the template fields.
    /// The template id is left for the client to fill from configuration.
    pub async fn generate(
        &self,
        certificate: &Certificate,
    ) -> Result<GeneratorResponse, PdfGeneratorError> {
        let options = DocumentOptions {
            template: TemplateReference {
                id: None,
                data: certificate.template_data(),
            },
            format: DocumentFormat::Pdf,
            output: DocumentOutput::Base64,
            name: certificate.document_name(),
            testing: false,
        };
        self.generator.generate_document(options).await
    }

    /// Records the certificate. Returns `None` when no store is configured.
    pub async fn create(&self, certificate: &Certificate) -> Result<Option<i64>, sqlx::Error> {
        match &self.store {
            Some(store) => store.insert_certificate(certificate).await.map(Some),
            None => Ok(None),
        }
    }

    /// Generates the document, then records it. A failed insert is logged and
    /// does not affect the result since the document already exists.
    pub async fn issue(&self, certificate: &Certificate) -> Result<IssuedCertificate, CertificateError> {
        let response = self.generate(certificate).await?;

        if response.is_rate_limited() {
            warn!(
                "Document generator rate limited certificate {} (retry after {:?})",
                certificate.document_name(),
                response.retry_after
            );
            return Err(CertificateError::UpstreamRateLimited {
                retry_after: response.retry_after,
            });
        }

        if !response.is_success() {
            error!(
                "Document generator failed with status {}: {}",
                response.status,
                response.body_text()
            );
            return Err(CertificateError::UpstreamFailure {
                status: response.status,
            });
        }

        // Any JSON body is relayed as is; `meta.name` is only used for logging.
        let document: serde_json::Value = response.json().map_err(|e| {
            CertificateError::Unexpected(format!("Unreadable generator response: {}", e))
        })?;
        let document_name = document["meta"]["name"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| certificate.document_name());
        info!("Generated certificate document {}", document_name);

        let record_id = match self.create(certificate).await {
            Ok(Some(id)) => {
                info!("Certificate {} stored with id {}", document_name, id);
                Some(id)
            }
            Ok(None) => {
                debug!("Certificate persistence disabled, skipping record");
                None
            }
            Err(e) => {
                error!("Failed to store certificate {}: {}", document_name, e);
                None
            }
        };

        Ok(IssuedCertificate {
            document_name,
            raw_body: response.body,
            record_id,
        })
    }
}
