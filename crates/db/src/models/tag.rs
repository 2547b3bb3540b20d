//! Genre and author models and DTOs.

use bookshelf_core::tags::MAX_TAG_NAME_LEN;
use bookshelf_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A row from the `genres` or `authors` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
}

/// A tag together with the book it is linked to, from a batch load.
#[derive(Debug, Clone, FromRow)]
pub struct BookTag {
    pub book_id: DbId,
    pub id: DbId,
    pub name: String,
}

impl From<BookTag> for Tag {
    fn from(row: BookTag) -> Self {
        Tag {
            id: row.id,
            name: row.name,
        }
    }
}

/// `{"name": "..."}` element of a book payload's `genres` / `authors` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
}

/// DTO for renaming a genre or author.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTag {
    #[validate(custom(function = "validate_tag_name"))]
    pub name: String,
}

/// Reject names that are blank after trimming or longer than a column allows.
pub fn validate_tag_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("This field may not be blank.".into()));
    }
    if name.trim().chars().count() > MAX_TAG_NAME_LEN {
        return Err(ValidationError::new("max_length")
            .with_message("Ensure this field has no more than 255 characters.".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_requires_non_blank_name() {
        assert!(UpdateTag { name: "  ".into() }.validate().is_err());
        assert!(UpdateTag { name: "Memoir".into() }.validate().is_ok());
    }

    #[test]
    fn rename_rejects_overlong_name() {
        let name = "x".repeat(MAX_TAG_NAME_LEN + 1);
        assert!(UpdateTag { name }.validate().is_err());
    }
}
