//! Genre/author filters for book listings.
//!
//! `?genres=Fantasy,Memoir&authors=Tolkien` keeps books that have at least
//! one listed genre AND at least one listed author. Names are compared
//! literally against stored canonical names; they are neither trimmed nor
//! normalized. An empty parameter value is treated as absent.

use crate::tags::TagKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub genres: Option<Vec<String>>,
    pub authors: Option<Vec<String>>,
}

impl BookFilter {
    /// Build a filter from raw comma-separated query values.
    ///
    /// ```
    /// use bookshelf_core::filter::BookFilter;
    ///
    /// let filter = BookFilter::from_params(Some("Fantasy,Memoir"), None);
    /// assert_eq!(filter.genres.as_deref(), Some(&["Fantasy".to_string(), "Memoir".to_string()][..]));
    /// assert!(filter.authors.is_none());
    /// ```
    pub fn from_params(genres: Option<&str>, authors: Option<&str>) -> Self {
        BookFilter {
            genres: genres.and_then(split_names),
            authors: authors.and_then(split_names),
        }
    }

    pub fn names(&self, kind: TagKind) -> Option<&[String]> {
        match kind {
            TagKind::Genre => self.genres.as_deref(),
            TagKind::Author => self.authors.as_deref(),
        }
    }
}

fn split_names(value: &str) -> Option<Vec<String>> {
    if value.is_empty() {
        return None;
    }
    Some(value.split(',').map(str::to_string).collect())
}
