//! Client for the external PDF Generator API.

pub mod client;
pub mod models;
pub mod token;

pub use client::*;
pub use models::*;
