//! Ownership policy for books.
//!
//! A book is visible to, and mutable by, its owner only. Callers that are not
//! the owner see the book as missing: [`authorize`] reports a foreign book
//! and an absent one with the same [`CoreError::NotFound`].

use crate::error::CoreError;
use crate::types::DbId;

/// The authenticated identity making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
}

/// A resource with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> DbId;
}

/// Listing predicate: only rows owned by `owner_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    pub owner_id: DbId,
}

impl Actor {
    pub fn new(user_id: DbId) -> Self {
        Actor { user_id }
    }

    pub fn can_access<R: Owned + ?Sized>(&self, resource: &R) -> bool {
        resource.owner_id() == self.user_id
    }

    /// Scope every listing query runs under.
    pub fn scope(&self) -> OwnerScope {
        OwnerScope {
            owner_id: self.user_id,
        }
    }
}

/// Return `resource` if it exists and `actor` owns it.
pub fn authorize<R: Owned>(
    actor: &Actor,
    resource: Option<R>,
    entity: &'static str,
    id: DbId,
) -> Result<R, CoreError> {
    match resource {
        Some(resource) if actor.can_access(&resource) => Ok(resource),
        _ => Err(CoreError::NotFound { entity, id }),
    }
}
