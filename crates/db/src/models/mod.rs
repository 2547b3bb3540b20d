//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request payloads and the validated DTOs built from them

pub mod book;
pub mod tag;
pub mod user;
