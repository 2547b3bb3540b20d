//! HTTP request handlers, one module per resource.

pub mod books;
pub mod catalog;
