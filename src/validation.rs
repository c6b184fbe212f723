//! Field validators and the result type they fold into.
//!
//! Every validator is a pure function returning `Option<ValidationError>`;
//! callers collect them into a [`ValidationResult`] so that all fields are
//! checked even after an earlier one fails.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IMAGE_PATH: Regex = Regex::new(r"(?i)\.(jpeg|jpg|png)$").unwrap();
}

/// MIME types accepted for uploaded certificate images.
pub const ALLOWED_IMAGE_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Wire name of the field that failed
    pub field: &'static str,
    /// Message returned to the client
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str, label: &str) -> Self {
        Self::new(field, format!("{} is required", label))
    }

    pub fn length(field: &'static str, label: &str, min: usize, max: usize) -> Self {
        Self::new(
            field,
            format!(
                "{} requires at least {}, and at most {} characters",
                label, min, max
            ),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Ordered, immutable collection of validation errors. Empty means success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_messages(self) -> Vec<String> {
        self.errors.into_iter().map(|e| e.message).collect()
    }
}

impl FromIterator<Option<ValidationError>> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Option<ValidationError>>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().flatten().collect(),
        }
    }
}

fn is_missing(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// Presence plus an inclusive character-count bound.
pub fn validate_length(
    value: Option<&str>,
    field: &'static str,
    label: &str,
    min: usize,
    max: usize,
) -> Option<ValidationError> {
    if is_missing(value) {
        return Some(ValidationError::required(field, label));
    }
    let count = value.unwrap_or_default().chars().count();
    if count < min || count > max {
        return Some(ValidationError::length(field, label, min, max));
    }
    None
}

/// Presence plus calendar-date parseability.
pub fn validate_date(value: Option<&str>, field: &'static str, label: &str) -> Option<ValidationError> {
    if is_missing(value) {
        return Some(ValidationError::required(field, label));
    }
    if parse_calendar_date(value.unwrap_or_default()).is_none() {
        return Some(ValidationError::new(field, format!("{} provided is invalid", label)));
    }
    None
}

/// Presence plus an absolute URL whose path ends in an image extension.
pub fn validate_image_url(value: Option<&str>, field: &'static str) -> Option<ValidationError> {
    if is_missing(value) {
        return Some(ValidationError::required(field, "Image URL"));
    }
    if !is_valid_image_url(value.unwrap_or_default()) {
        return Some(ValidationError::new(field, "Image URL must be a valid image URL"));
    }
    None
}

/// Presence of an uploaded file plus an allowed MIME type.
pub fn validate_image_mime_type(
    mime_type: Option<&str>,
    field: &'static str,
) -> Option<ValidationError> {
    match mime_type {
        None => Some(ValidationError::required(field, "Image file")),
        Some(mime) if !ALLOWED_IMAGE_MIME_TYPES.contains(&mime) => Some(ValidationError::new(
            field,
            "Image files are required to be either jpeg or png",
        )),
        Some(_) => None,
    }
}

pub fn is_valid_image_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(parsed) => IMAGE_PATH.is_match(parsed.path()),
        Err(_) => false,
    }
}

/// Accepts RFC 3339 timestamps and the common ISO 8601 date/datetime forms.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|dt| dt.date())
}
