//! Reconciliation of a book's genre or author associations.
//!
//! A write request may carry a list of tag names per kind. When the list is
//! present (even empty) the book's associations of that kind are replaced by
//! exactly the tags those names resolve to; when it is absent nothing is
//! touched. Name resolution and link storage go through [`TagStore`], so the
//! reconciliation rules live here and the storage lives in the db crate.
//!
//! Names are resolved in ascending case-insensitive order. Creating a tag
//! holds its unique-index entry until the transaction commits, so two writes
//! creating the same new tags must take those entries in the same order.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use crate::tag_name::normalize_tag_name;
use crate::tags::TagKind;
use crate::types::DbId;

/// Storage operations the synchronizer needs.
///
/// Implementations are expected to run all calls for one book inside a
/// single transaction. `resolve` must be safe against concurrent creation of
/// the same canonical name.
#[async_trait]
pub trait TagStore: Send {
    type Error: Send;

    /// Return the id of the tag whose name matches `canonical`
    /// case-insensitively, creating it (with `canonical` as typed) if absent.
    async fn resolve(&mut self, kind: TagKind, canonical: &str) -> Result<DbId, Self::Error>;

    /// Ids of the tags of `kind` currently linked to `book_id`.
    async fn linked(&mut self, kind: TagKind, book_id: DbId)
        -> Result<BTreeSet<DbId>, Self::Error>;

    /// Link `tag_ids` to `book_id`. Ids already linked are ignored.
    async fn link(
        &mut self,
        kind: TagKind,
        book_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), Self::Error>;

    /// Remove the links between `book_id` and `tag_ids`. The tags survive.
    async fn unlink(
        &mut self,
        kind: TagKind,
        book_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), Self::Error>;
}

/// Difference between the current and desired association sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_add: Vec<DbId>,
    pub to_remove: Vec<DbId>,
}

impl SyncPlan {
    pub fn between(current: &BTreeSet<DbId>, desired: &BTreeSet<DbId>) -> Self {
        SyncPlan {
            to_add: desired.difference(current).copied().collect(),
            to_remove: current.difference(desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Normalize `names` and drop case-insensitive duplicates, keeping the first
/// spelling. The result is sorted by lowercase canonical name.
///
/// ```
/// use bookshelf_core::sync::canonical_names;
///
/// let names = vec!["memoir".to_string(), " ESSAY ".to_string(), "Memoir".to_string()];
/// assert_eq!(canonical_names(&names), vec!["Essay", "Memoir"]);
/// ```
pub fn canonical_names(names: &[String]) -> Vec<String> {
    let mut by_key: BTreeMap<String, String> = BTreeMap::new();
    for name in names {
        let canonical = normalize_tag_name(name);
        by_key.entry(canonical.to_lowercase()).or_insert(canonical);
    }
    by_key.into_values().collect()
}

/// Replace the `kind` associations of `book_id` with the tags named in
/// `desired`.
///
/// Returns `None` when `desired` is absent (nothing was done), otherwise the
/// plan that was applied. Names are normalized before resolution, so
/// `"  fantasy "` and `"FANTASY"` collapse into a single association.
pub async fn sync_book_tags<S>(
    store: &mut S,
    book_id: DbId,
    kind: TagKind,
    desired: Option<&[String]>,
) -> Result<Option<SyncPlan>, S::Error>
where
    S: TagStore + ?Sized,
{
    let Some(names) = desired else {
        return Ok(None);
    };

    let mut desired_ids = BTreeSet::new();
    for canonical in canonical_names(names) {
        desired_ids.insert(store.resolve(kind, &canonical).await?);
    }

    let current = store.linked(kind, book_id).await?;
    let plan = SyncPlan::between(&current, &desired_ids);

    if !plan.to_remove.is_empty() {
        store.unlink(kind, book_id, &plan.to_remove).await?;
    }
    if !plan.to_add.is_empty() {
        store.link(kind, book_id, &plan.to_add).await?;
    }

    Ok(Some(plan))
}
