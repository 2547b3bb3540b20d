//! Book models, response shapes and request payloads.

use bookshelf_core::access::Owned;
use bookshelf_core::error::{field_errors_from, CoreError, FieldErrors};
use bookshelf_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::models::tag::{validate_tag_name, Tag, TagRef};

/// Maximum length of `title` and `link`.
const MAX_TEXT_LEN: usize = 255;

/// Prices are `NUMERIC(5, 2)`.
const PRICE_MAX_DIGITS: u32 = 5;
const PRICE_DECIMAL_PLACES: u32 = 2;

const REQUIRED: &str = "This field is required.";

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `books` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub link: String,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Book {
    fn owner_id(&self) -> DbId {
        self.owner_id
    }
}

/// A book with its genres and authors loaded.
#[derive(Debug, Clone)]
pub struct BookWithTags {
    pub book: Book,
    pub genres: Vec<Tag>,
    pub authors: Vec<Tag>,
}

impl BookWithTags {
    pub fn into_summary(self) -> BookSummary {
        BookSummary {
            id: self.book.id,
            title: self.book.title,
            price: self.book.price,
            link: self.book.link,
            image: self.book.image,
            genres: self.genres,
            authors: self.authors,
        }
    }

    pub fn into_detail(self) -> BookDetail {
        let description = self.book.description.clone();
        BookDetail {
            summary: self.into_summary(),
            description,
        }
    }
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// List representation. Omits `description`.
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub id: DbId,
    pub title: String,
    pub price: Decimal,
    pub link: String,
    pub image: Option<String>,
    pub genres: Vec<Tag>,
    pub authors: Vec<Tag>,
}

/// Detail representation.
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub summary: BookSummary,
    pub description: String,
}

/// Response of the image upload endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BookImage {
    pub id: DbId,
    pub image: Option<String>,
}

impl From<Book> for BookImage {
    fn from(book: Book) -> Self {
        BookImage {
            id: book.id,
            image: book.image,
        }
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// JSON body of `POST`, `PUT` and `PATCH /books`.
///
/// Every field is optional here so that missing fields can be reported per
/// field; [`BookPayload::into_create`] enforces the required ones. There is
/// deliberately no owner field: unknown keys such as `"owner"` or `"user"`
/// are dropped by serde, which keeps the owner immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookPayload {
    #[validate(custom(function = "validate_text"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "validate_text"))]
    pub link: Option<String>,
    #[validate(custom(function = "validate_tag_refs"))]
    pub genres: Option<Vec<TagRef>>,
    #[validate(custom(function = "validate_tag_refs"))]
    pub authors: Option<Vec<TagRef>>,
}

/// Validated DTO for inserting a book (also used by full replacement).
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBook {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub link: String,
    /// `None` when the request omitted the field.
    pub genres: Option<Vec<String>>,
    pub authors: Option<Vec<String>>,
}

/// Validated DTO for updating a book. Only `Some` fields are applied and only
/// `Some` tag lists are synchronized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub genres: Option<Vec<String>>,
    pub authors: Option<Vec<String>>,
}

impl From<CreateBook> for UpdateBook {
    fn from(input: CreateBook) -> Self {
        UpdateBook {
            title: Some(input.title),
            description: Some(input.description),
            price: Some(input.price),
            link: Some(input.link),
            genres: input.genres,
            authors: input.authors,
        }
    }
}

impl BookPayload {
    /// Validate a create (or full replace) request.
    pub fn into_create(self) -> Result<CreateBook, CoreError> {
        let mut fields = self.field_errors();
        for (field, missing) in [
            ("title", self.title.is_none()),
            ("price", self.price.is_none()),
            ("link", self.link.is_none()),
        ] {
            if missing {
                fields.entry(field.to_string()).or_default().push(REQUIRED.to_string());
            }
        }

        match (self.title, self.price, self.link) {
            (Some(title), Some(price), Some(link)) if fields.is_empty() => Ok(CreateBook {
                title: title.trim().to_string(),
                description: self
                    .description
                    .map(|d| d.trim().to_string())
                    .unwrap_or_default(),
                price,
                link: link.trim().to_string(),
                genres: tag_names(self.genres),
                authors: tag_names(self.authors),
            }),
            _ => Err(CoreError::InvalidFields(fields)),
        }
    }

    /// Validate a partial update request.
    pub fn into_update(self) -> Result<UpdateBook, CoreError> {
        let fields = self.field_errors();
        if !fields.is_empty() {
            return Err(CoreError::InvalidFields(fields));
        }

        Ok(UpdateBook {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            price: self.price,
            link: self.link.map(|l| l.trim().to_string()),
            genres: tag_names(self.genres),
            authors: tag_names(self.authors),
        })
    }

    fn field_errors(&self) -> FieldErrors {
        match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => field_errors_from(&errors),
        }
    }
}

fn tag_names(tags: Option<Vec<TagRef>>) -> Option<Vec<String>> {
    tags.map(|tags| tags.into_iter().map(|tag| tag.name).collect())
}

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

fn validate_text(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new("blank").with_message("This field may not be blank.".into()));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::new("max_length")
            .with_message("Ensure this field has no more than 255 characters.".into()));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("min_value")
            .with_message("Ensure this value is greater than or equal to 0.".into()));
    }
    let price = price.normalize();
    if price.scale() > PRICE_DECIMAL_PLACES {
        return Err(ValidationError::new("max_decimal_places")
            .with_message("Ensure that there are no more than 2 decimal places.".into()));
    }
    let max_integer = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
    if price >= max_integer {
        return Err(ValidationError::new("max_digits")
            .with_message("Ensure that there are no more than 5 digits in total.".into()));
    }
    Ok(())
}

fn validate_tag_refs(tags: &[TagRef]) -> Result<(), ValidationError> {
    tags.iter().try_for_each(|tag| validate_tag_name(&tag.name))
}
