//! Static certificate form served at `/`.

use actix_web::{http::header::ContentType, web, HttpResponse, Responder};

pub const INDEX_HTML: &str = include_str!("../static/index.html");

pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)));
}
