//! Domain logic for the bookshelf catalog.
//!
//! Everything in this crate is storage-agnostic: tag name normalization,
//! association synchronization (behind the [`sync::TagStore`] seam), the
//! ownership policy, list filtering and upload validation.

pub mod access;
pub mod error;
pub mod filter;
pub mod images;
pub mod sync;
pub mod tag_name;
pub mod tags;
pub mod types;
