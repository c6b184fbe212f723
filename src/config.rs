//! Runtime configuration loaded once from the environment.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_PDF_GENERATOR_BASE_URL: &str = "https://us1.pdfgeneratorapi.com/api/v4";
const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
    #[error("environment variable {name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_image_file_size_mb: u64,
    /// `None` disables certificate persistence.
    pub sqlite_database_filename: Option<PathBuf>,
    pub pdf_generator: PdfGeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct PdfGeneratorConfig {
    pub base_url: String,
    pub workspace_id: String,
    pub api_key: String,
    pub api_secret: String,
    pub certificate_template_id: String,
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port_raw = required("CERTIFICATES_PORT")?;
        let port = port_raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "CERTIFICATES_PORT",
            value: port_raw.clone(),
        })?;

        let size_raw = required("MAX_IMAGE_FILE_SIZE_MB")?;
        let max_image_file_size_mb = match size_raw.trim().parse::<u64>() {
            Ok(mb) if mb > 0 => mb,
            _ => {
                return Err(ConfigError::Invalid {
                    name: "MAX_IMAGE_FILE_SIZE_MB",
                    value: size_raw,
                })
            }
        };

        let host = lookup("CERTIFICATES_HOST")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let sqlite_database_filename = lookup("SQLITE_DATABASE_FILENAME")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let pdf_generator = PdfGeneratorConfig {
            base_url: lookup("PDF_GENERATOR_BASE_URL")
                .filter(|value| !value.trim().is_empty())
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PDF_GENERATOR_BASE_URL.to_string()),
            workspace_id: required("PDF_GENERATOR_WORKSPACE_ID")?,
            api_key: required("PDF_GENERATOR_API_KEY")?,
            api_secret: required("PDF_GENERATOR_API_SECRET")?,
            certificate_template_id: required("PDF_GENERATOR_CERTIFICATE_TEMPLATE_ID")?,
        };

        Ok(Config {
            host,
            port,
            max_image_file_size_mb,
            sqlite_database_filename,
            pdf_generator,
        })
    }

    pub fn max_image_file_size_bytes(&self) -> usize {
        (self.max_image_file_size_mb as usize).saturating_mul(1024 * 1024)
    }
}
