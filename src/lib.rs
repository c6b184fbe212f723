use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod certificate;
pub mod config;
pub mod db;
pub mod error;
pub mod frontend;
pub mod pdf_generator;
pub mod validation;

pub use crate::config::Config;
pub use crate::db::AppState;
pub use crate::error::CertificateError;

/// Error body shared by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ErrorResponse {
    #[schema(example = json!(["Subject is required"]))]
    pub messages: Vec<String>,
}

impl ErrorResponse {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::certificate::routes::create_certificate,
        crate::certificate::routes::create_certificate_with_upload,
    ),
    components(schemas(
        certificate::models::CertificateRequest,
        certificate::models::CertificateUploadRequest,
        pdf_generator::PdfBase64Response,
        pdf_generator::PdfMeta,
        ErrorResponse,
    )),
    tags(
        (name = "Certificate Service", description = "PDF certificate generation endpoints.")
    )
)]
pub struct ApiDoc;

/// Registers the form page and the `/api` routes.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.configure(frontend::config)
        .service(web::scope("/api").configure(certificate::routes::config));
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new_with_config(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to initialise application state: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("certificate_generator_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let port = config.port;
    log::info!("Starting server at http://{}:{}", config.host, port);
    log::info!(
        "Image uploads limited to {}mb, generator at {}",
        config.max_image_file_size_mb,
        config.pdf_generator.base_url
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin(&format!("http://localhost:{}", port))
            .allowed_origin(&format!("http://127.0.0.1:{}", port))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::RETRY_AFTER])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(configure_app)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), port))?
    .run()
    .await
}
