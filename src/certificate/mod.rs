pub mod models;
pub mod multipart_parser;
pub mod routes;
pub mod service;
pub mod validations;
