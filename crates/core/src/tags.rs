//! Genre and author tag kinds.
//!
//! Genres and authors are structurally identical: an id plus a canonical
//! name, shared by every book and every user. [`TagKind`] selects which
//! table and association table an operation touches.

use serde::{Deserialize, Serialize};

/// Maximum length of a stored tag name.
pub const MAX_TAG_NAME_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Genre,
    Author,
}

impl TagKind {
    pub const ALL: [TagKind; 2] = [TagKind::Genre, TagKind::Author];

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            TagKind::Genre => "Genre",
            TagKind::Author => "Author",
        }
    }

    /// Table holding the tags themselves.
    pub fn table(self) -> &'static str {
        match self {
            TagKind::Genre => "genres",
            TagKind::Author => "authors",
        }
    }

    /// Junction table linking books to tags of this kind.
    pub fn link_table(self) -> &'static str {
        match self {
            TagKind::Genre => "book_genres",
            TagKind::Author => "book_authors",
        }
    }

    /// Tag foreign-key column inside [`TagKind::link_table`].
    pub fn link_column(self) -> &'static str {
        match self {
            TagKind::Genre => "genre_id",
            TagKind::Author => "author_id",
        }
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TagKind::Genre => "genre",
            TagKind::Author => "author",
        })
    }
}
