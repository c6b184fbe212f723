mod common;

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{http::header, http::StatusCode, test, web, App};
use certificate_generator_server::db::Database;
use certificate_generator_server::{configure_app, ErrorResponse};

use common::{
    multipart_body, multipart_content_type, test_state, valid_text_parts, MockDocumentGenerator,
    Part,
};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn messages(body: &[u8]) -> HashSet<String> {
    let response: ErrorResponse = serde_json::from_slice(body).unwrap();
    response.messages.into_iter().collect()
}

fn upload_request(parts: &[Part<'_>]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/certificates-with-upload")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(parts))
}

#[actix_web::test]
async fn test_valid_upload_sends_data_url_and_stores_it() {
    let generator = MockDocumentGenerator::succeeding();
    let database = Database::in_memory().await.unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(
                generator.clone(),
                Some(Arc::new(database.clone())),
                2,
            )))
            .configure(configure_app),
    )
    .await;

    let mut parts = valid_text_parts();
    parts.push(Part::File {
        name: "image",
        filename: "logo.png",
        content_type: "image/png",
        data: PNG_BYTES,
    });

    let resp = test::call_service(&app, upload_request(&parts).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let expected_image = "data:image/png;base64,iVBORw0KGgo=";
    let calls = generator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].template.data.image, expected_image);
    assert_eq!(calls[0].template.data.student_name, "Jane Doe");

    let records = database.list_certificates().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        database
            .get_certificate_image(records[0].id)
            .await
            .unwrap()
            .as_deref(),
        Some(expected_image)
    );
}

#[actix_web::test]
async fn test_oversize_file_is_rejected_before_validation() {
    let generator = MockDocumentGenerator::succeeding();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(generator.clone(), None, 1)))
            .configure(configure_app),
    )
    .await;

    let oversize = vec![0u8; 1024 * 1024 + 1];
    let parts = [Part::File {
        name: "image",
        filename: "huge.png",
        content_type: "image/png",
        data: &oversize,
    }];

    let resp = test::call_service(&app, upload_request(&parts).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert_eq!(
        messages(&body),
        HashSet::from(["Image file has to be at most 1mb".to_string()])
    );
    assert!(generator.calls().is_empty());
}

#[actix_web::test]
async fn test_file_at_limit_is_accepted() {
    let generator = MockDocumentGenerator::succeeding();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(generator.clone(), None, 1)))
            .configure(configure_app),
    )
    .await;

    let exact = vec![0u8; 1024 * 1024];
    let mut parts = valid_text_parts();
    parts.push(Part::File {
        name: "image",
        filename: "exact.jpg",
        content_type: "image/jpeg",
        data: &exact,
    });

    let resp = test::call_service(&app, upload_request(&parts).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(generator.calls().len(), 1);
}

#[actix_web::test]
async fn test_non_image_mime_type_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(
                MockDocumentGenerator::succeeding(),
                None,
                2,
            )))
            .configure(configure_app),
    )
    .await;

    let mut parts = valid_text_parts();
    parts.push(Part::File {
        name: "image",
        filename: "notes.txt",
        content_type: "text/plain",
        data: b"not an image",
    });

    let resp = test::call_service(&app, upload_request(&parts).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert_eq!(
        messages(&body),
        HashSet::from(["Image files are required to be either jpeg or png".to_string()])
    );
}

#[actix_web::test]
async fn test_missing_fields_and_file_are_all_reported() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(
                MockDocumentGenerator::succeeding(),
                None,
                2,
            )))
            .configure(configure_app),
    )
    .await;

    let resp = test::call_service(&app, upload_request(&[Part::Text("subject", "")]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert_eq!(
        messages(&body),
        [
            "Subject is required",
            "Student Name is required",
            "Date is required",
            "Signature Name is required",
            "Image file is required",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect::<HashSet<_>>()
    );
}

#[actix_web::test]
async fn test_empty_file_input_counts_as_missing_image() {
    let generator = MockDocumentGenerator::succeeding();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(generator.clone(), None, 2)))
            .configure(configure_app),
    )
    .await;

    let mut parts = valid_text_parts();
    parts.push(Part::File {
        name: "image",
        filename: "",
        content_type: "application/octet-stream",
        data: b"",
    });

    let resp = test::call_service(&app, upload_request(&parts).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert_eq!(
        messages(&body),
        HashSet::from(["Image file is required".to_string()])
    );
    assert!(generator.calls().is_empty());
}

#[actix_web::test]
async fn test_file_in_unexpected_field_is_rejected() {
    let generator = MockDocumentGenerator::succeeding();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(generator.clone(), None, 2)))
            .configure(configure_app),
    )
    .await;

    let mut parts = valid_text_parts();
    parts.push(Part::File {
        name: "attachment",
        filename: "logo.png",
        content_type: "image/png",
        data: PNG_BYTES,
    });

    let resp = test::call_service(&app, upload_request(&parts).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(resp).await;
    assert_eq!(
        messages(&body),
        HashSet::from(["Unexpected file error".to_string()])
    );
    assert!(generator.calls().is_empty());
}

#[actix_web::test]
async fn test_rate_limit_applies_to_uploads() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(
                MockDocumentGenerator::with_response(429, Some("5"), b"{}".to_vec()),
                None,
                2,
            )))
            .configure(configure_app),
    )
    .await;

    let mut parts = valid_text_parts();
    parts.push(Part::File {
        name: "image",
        filename: "logo.png",
        content_type: "image/png",
        data: PNG_BYTES,
    });

    let resp = test::call_service(&app, upload_request(&parts).to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get(header::RETRY_AFTER).unwrap(), "5");
}
