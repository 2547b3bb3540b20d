use std::collections::BTreeMap;

use crate::types::DbId;

/// Per-field validation messages, keyed by request field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed for fields: {}", field_list(.0))]
    InvalidFields(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl CoreError {
    /// Shorthand for a single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        CoreError::InvalidFields(fields)
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::InvalidFields(field_errors_from(&errors))
    }
}

/// Flatten `validator` field errors into [`FieldErrors`], preferring each
/// error's message over its code.
pub fn field_errors_from(errors: &validator::ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => e.code.to_string(),
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }
    fields
}

fn field_list(fields: &FieldErrors) -> String {
    fields.keys().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::{ValidationError, ValidationErrors};

    use super::*;

    #[test]
    fn single_field_error_carries_message() {
        let err = CoreError::field("image", "Upload a valid image.");
        assert_matches!(err, CoreError::InvalidFields(ref fields) if fields["image"] == vec!["Upload a valid image.".to_string()]);
        assert_eq!(err.to_string(), "Validation failed for fields: image");
    }

    #[test]
    fn validator_errors_prefer_message_over_code() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "title",
            ValidationError::new("blank").with_message("This field may not be blank.".into()),
        );
        errors.add("price", ValidationError::new("price_range"));

        let err = CoreError::from(errors);
        let CoreError::InvalidFields(fields) = err else {
            panic!("expected InvalidFields");
        };
        assert_eq!(fields["title"], vec!["This field may not be blank."]);
        assert_eq!(fields["price"], vec!["price_range"]);
    }
}
