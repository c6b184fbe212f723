//! Certificate database operations

use async_trait::async_trait;

use super::Database;
use crate::certificate::models::{Certificate, CertificateRecord};
use crate::certificate::service::CertificateStore;

impl Database {
    pub async fn insert_certificate(&self, certificate: &Certificate) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO certificates (date, subject, signature_name, student_name, image)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&certificate.date)
        .bind(&certificate.subject)
        .bind(&certificate.signature_name)
        .bind(&certificate.student_name)
        .bind(&certificate.image)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// All stored certificates, oldest first. The image column is omitted since it may hold a data URL.
    pub async fn list_certificates(&self) -> Result<Vec<CertificateRecord>, sqlx::Error> {
        sqlx::query_as::<_, CertificateRecord>(
            "SELECT id, date, subject, signature_name, student_name FROM certificates ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_certificate_image(&self, id: i64) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT image FROM certificates WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait]
impl CertificateStore for Database {
    async fn insert_certificate(&self, certificate: &Certificate) -> Result<i64, sqlx::Error> {
        Database::insert_certificate(self, certificate).await
    }
}
