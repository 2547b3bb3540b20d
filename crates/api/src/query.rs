//! Query parameter types for API handlers.

use serde::Deserialize;

/// Filters for `GET /books` (`?genres=A,B&authors=C`).
///
/// Values are raw comma-separated names; `BookFilter::from_params` splits
/// them.
#[derive(Debug, Default, Deserialize)]
pub struct BookListParams {
    pub genres: Option<String>,
    pub authors: Option<String>,
}
