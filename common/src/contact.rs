//! Contact / lead form payload and its field validation.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+()\d\s.-]{6,20}$").unwrap());

/// Form fields in display order. Errors are reported in this order.
const FIELDS: [&str; 7] = [
    "name", "email", "company", "phone", "subject", "message", "consent",
];

fn de_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).unwrap_or_default())
}

/// Blank optional fields count as not filled in.
fn de_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn accepted(consent: &bool) -> Result<(), ValidationError> {
    if *consent {
        return Ok(());
    }
    let mut error = ValidationError::new("consent");
    error.message = Some(Cow::from("Consent is required to process your request"));
    Err(error)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default, deserialize_with = "de_trimmed")]
    #[validate(length(min = 1, max = 100, message = "Name is required (100 characters max)"))]
    pub name: String,
    #[serde(default, deserialize_with = "de_trimmed")]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default, deserialize_with = "de_optional", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "de_optional", skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE, message = "Enter a valid phone number"))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de_optional", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "de_trimmed")]
    #[validate(length(min = 10, max = 5000, message = "Message must be 10 to 5000 characters"))]
    pub message: String,
    #[serde(default)]
    #[validate(custom(function = "accepted"))]
    pub consent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

/// Keeps the first message per field, in form order.
impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let by_field = errors.field_errors();
        Self(
            FIELDS
                .iter()
                .filter_map(|&field| {
                    let first = by_field.get(field)?.first()?;
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {field}"));
                    Some(FieldError { field, message })
                })
                .collect(),
        )
    }
}

impl ContactSubmission {
    /// Checks every field and reports all failures together.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validate::validate(self).map_err(ValidationErrors::from)
    }
}
