//! Database module - AppState and database operations
//!
//! - `certificate` - certificate record operations

mod certificate;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::certificate::service::{CertificateService, CertificateStore};
use crate::config::Config;
use crate::pdf_generator::{DocumentGenerator, PdfGeneratorClient};

const CREATE_CERTIFICATES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS certificates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    subject TEXT NOT NULL,
    signature_name TEXT NOT NULL,
    student_name TEXT NOT NULL,
    image TEXT NOT NULL
)
"#;

/// Local SQLite store for issued certificates.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database file and ensures the schema exists.
    pub async fn connect(filename: &Path) -> Result<Self, sqlx::Error> {
        if let Some(parent) = filename.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(filename)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        let database = Database { pool };
        database.ensure_schema().await?;
        Ok(database)
    }

    /// Single-connection in-memory database, used by tests.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let database = Database { pool };
        database.ensure_schema().await?;
        Ok(database)
    }

    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_CERTIFICATES_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub certificates: CertificateService,
    pub max_image_file_size_mb: u64,
}

impl AppState {
    pub async fn new_with_config(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(900))
            .timeout(Duration::from_secs(60))
            .user_agent("certificate-generator-server/1.0")
            .build()?;

        let generator: Arc<dyn DocumentGenerator> = Arc::new(PdfGeneratorClient::new(
            config.pdf_generator.clone(),
            http_client,
        ));

        let store: Option<Arc<dyn CertificateStore>> = match &config.sqlite_database_filename {
            Some(filename) => {
                let database = Database::connect(filename).await?;
                log::info!("Certificate records stored in {}", filename.display());
                Some(Arc::new(database))
            }
            None => {
                log::warn!("SQLITE_DATABASE_FILENAME not set, certificate records will not be stored");
                None
            }
        };

        Ok(Self::new_with_service(
            CertificateService::new(generator, store),
            config.max_image_file_size_mb,
        ))
    }

    pub fn new_with_service(certificates: CertificateService, max_image_file_size_mb: u64) -> Self {
        AppState {
            certificates,
            max_image_file_size_mb,
        }
    }
}
