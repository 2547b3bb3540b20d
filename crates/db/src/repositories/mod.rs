//! Repository layer: zero-sized structs with async CRUD methods.

pub mod book_repo;
pub mod book_tag_store;
pub mod tag_repo;
pub mod user_repo;

pub use book_repo::BookRepo;
pub use book_tag_store::PgTagStore;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
