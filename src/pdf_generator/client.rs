use async_trait::async_trait;
use log::debug;
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};

use super::models::DocumentOptions;
use super::token::{generate_token, get_token_expiry};
use crate::config::PdfGeneratorConfig;

#[derive(Debug, thiserror::Error)]
pub enum PdfGeneratorError {
    #[error("Failed to sign generator token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Generator request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Raw generator response. Status codes are not interpreted here.
#[derive(Debug, Clone)]
pub struct GeneratorResponse {
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: Vec<u8>,
}

impl GeneratorResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn generate_document(
        &self,
        options: DocumentOptions,
    ) -> Result<GeneratorResponse, PdfGeneratorError>;
}

/// HTTP client for the PDF Generator API.
pub struct PdfGeneratorClient {
    config: PdfGeneratorConfig,
    http_client: reqwest::Client,
}

impl PdfGeneratorClient {
    pub fn new(config: PdfGeneratorConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/documents/generate", self.config.base_url)
    }
}

#[async_trait]
impl DocumentGenerator for PdfGeneratorClient {
    async fn generate_document(
        &self,
        mut options: DocumentOptions,
    ) -> Result<GeneratorResponse, PdfGeneratorError> {
        let token = generate_token(
            &self.config.api_key,
            &self.config.workspace_id,
            &self.config.api_secret,
        )?;
        debug!("Signed generator token valid for {}s", get_token_expiry());

        if options.template.id.as_deref().map_or(true, str::is_empty) {
            options.template.id = Some(self.config.certificate_template_id.clone());
        }

        let response = self
            .http_client
            .post(self.generate_url())
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(&options)
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        debug!(
            "Generator responded with status {} ({} bytes)",
            status,
            body.len()
        );

        Ok(GeneratorResponse {
            status,
            retry_after,
            body,
        })
    }
}
