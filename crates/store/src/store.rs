//! The resource store.
//!
//! Owns the cached page and the observable `loading`/`error` status.
//! Operations take `&self` and may overlap; each one applies its own
//! cache mutation when it settles, so overlapping calls touching the
//! same record resolve last-settled-wins. That race is deliberate: the
//! usage pattern is single-user and low-contention, and the next fetch
//! replaces the cache wholesale anyway.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use curio_model::{BulkDeleteOutcome, Item, ItemDraft, ItemId, ItemPatch, Page, UserId};

use crate::error::StoreError;
use crate::transport::{ItemTransport, SessionProvider};

/// Pagination metadata from the last successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self { page: 1, limit: 10, total: 0, pages: 0 }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    items: Vec<Item>,
    meta: PageMeta,
    loading: bool,
    error: Option<String>,
}

/// Client-side source of truth for the currently displayed items page.
///
/// The status channel (`loading`/`error`) is last-write-wins across
/// overlapping operations: only one logical operation's status is
/// visible at a time, while each call's own `Result` stays independent.
pub struct ResourceStore {
    transport: Arc<dyn ItemTransport>,
    session: Arc<dyn SessionProvider>,
    state: Mutex<StoreState>,
}

impl ResourceStore {
    pub fn new(transport: Arc<dyn ItemTransport>, session: Arc<dyn SessionProvider>) -> Self {
        Self { transport, session, state: Mutex::new(StoreState::default()) }
    }

    // ── Observable status ───────────────────────────────────────────

    /// Snapshot of the cached page records.
    pub fn items(&self) -> Vec<Item> {
        self.state.lock().items.clone()
    }

    /// Pagination metadata from the last successful fetch.
    pub fn meta(&self) -> PageMeta {
        self.state.lock().meta
    }

    /// True while an operation is between start and settlement.
    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Most recent operation failure message, if any. Cleared when a new
    /// operation starts.
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Whether the cache currently holds a record with this id.
    pub fn contains(&self, id: ItemId) -> bool {
        self.state.lock().items.iter().any(|it| it.id == id)
    }

    // ── Operations ──────────────────────────────────────────────────

    /// Fetch one page and replace the cache wholesale.
    ///
    /// On failure the previous cache is preserved, the error signal is
    /// set, and the error is re-raised.
    pub async fn fetch_page(
        &self,
        page: u32,
        limit: u32,
        owner_id: Option<UserId>,
    ) -> Result<Page<Item>, StoreError> {
        self.begin();
        if page < 1 || limit < 1 {
            return Err(self.fail(StoreError::InvalidPage, "Error fetching items"));
        }

        match self.transport.list(page, limit, owner_id).await {
            Ok(fetched) => {
                {
                    let mut st = self.state.lock();
                    st.items = fetched.items.clone();
                    st.meta = PageMeta {
                        page: fetched.page,
                        limit: fetched.limit,
                        total: fetched.total,
                        pages: fetched.pages,
                    };
                }
                debug!(page, limit, total = fetched.total, "fetched items page");
                self.settle_ok();
                Ok(fetched)
            }
            Err(err) => Err(self.fail(err.into(), "Error fetching items")),
        }
    }

    /// Fetch a single record by id. Read-through: the cache is never
    /// consulted or updated.
    pub async fn get_one(&self, id: ItemId) -> Result<Item, StoreError> {
        self.begin();
        match self.transport.get(id).await {
            Ok(item) => {
                self.settle_ok();
                Ok(item)
            }
            Err(err) => Err(self.fail(err.into(), "Error fetching item")),
        }
    }

    /// Create an item and prepend it to the cache.
    ///
    /// The cache may transiently hold `limit + 1` records until the next
    /// fetch; display flows re-fetch, so this window is accepted.
    pub async fn create(&self, draft: &ItemDraft) -> Result<Item, StoreError> {
        self.begin();
        self.authorize("You must be logged in to create an item")?;

        match self.transport.create(draft).await {
            Ok(item) => {
                self.state.lock().items.insert(0, item.clone());
                debug!(id = item.id, "created item");
                self.settle_ok();
                Ok(item)
            }
            Err(err) => Err(self.fail(err.into(), "Error creating item")),
        }
    }

    /// Update an item, swapping the cached record in place.
    ///
    /// Cached order is preserved; an id not present in the cache leaves
    /// the cache unchanged.
    pub async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, StoreError> {
        self.begin();
        self.authorize("You must be logged in to update an item")?;

        match self.transport.update(id, patch).await {
            Ok(updated) => {
                {
                    let mut st = self.state.lock();
                    for slot in st.items.iter_mut() {
                        if slot.id == id {
                            *slot = updated.clone();
                        }
                    }
                }
                debug!(id, "updated item");
                self.settle_ok();
                Ok(updated)
            }
            Err(err) => Err(self.fail(err.into(), "Error updating item")),
        }
    }

    /// Delete an item and prune it from the cache.
    ///
    /// Pruning an id that is not cached is a no-op at this layer; the
    /// transport call still runs and may fail on its own.
    pub async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        self.begin();
        self.authorize("You must be logged in to delete an item")?;

        match self.transport.delete(id).await {
            Ok(()) => {
                self.state.lock().items.retain(|it| it.id != id);
                debug!(id, "deleted item");
                self.settle_ok();
                Ok(())
            }
            Err(err) => Err(self.fail(err.into(), "Error deleting item")),
        }
    }

    /// Delete multiple items in one batch request.
    ///
    /// Partial success is preserved: every server-reported `deleted_id`
    /// is pruned from the cache even when other ids failed, in which
    /// case the error signal carries a count summary. A total transport
    /// failure resolves (does not raise) with all requested ids failed
    /// and no pruning — callers inspect `failed_ids` either way.
    pub async fn delete_many(&self, ids: &[ItemId]) -> Result<BulkDeleteOutcome, StoreError> {
        self.begin();
        self.authorize("You must be logged in to delete items")?;

        if ids.is_empty() {
            self.settle_ok();
            return Ok(BulkDeleteOutcome::default());
        }

        match self.transport.bulk_delete(ids).await {
            Ok(outcome) => {
                if !outcome.deleted_ids.is_empty() {
                    let mut st = self.state.lock();
                    st.items.retain(|it| !outcome.deleted_ids.contains(&it.id));
                }
                if outcome.failed_ids.is_empty() {
                    debug!(deleted = outcome.deleted_ids.len(), "bulk delete complete");
                    self.settle_ok();
                } else {
                    warn!(
                        deleted = outcome.deleted_ids.len(),
                        failed = outcome.failed_ids.len(),
                        "bulk delete partially failed"
                    );
                    self.settle_err(format!(
                        "Failed to delete {} items. {} items were deleted successfully.",
                        outcome.failed_ids.len(),
                        outcome.deleted_ids.len()
                    ));
                }
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, "bulk delete request failed");
                self.fail(err.into(), "Error processing bulk item deletions");
                Ok(BulkDeleteOutcome::all_failed(ids))
            }
        }
    }

    // ── Status plumbing ─────────────────────────────────────────────

    /// Mark an operation started: loading on, error cleared.
    fn begin(&self) {
        let mut st = self.state.lock();
        st.loading = true;
        st.error = None;
    }

    fn settle_ok(&self) {
        self.state.lock().loading = false;
    }

    fn settle_err(&self, message: String) {
        let mut st = self.state.lock();
        st.loading = false;
        st.error = Some(message);
    }

    /// Settle a failed operation: pick the user-facing message, set the
    /// signal, hand the typed error back for re-raising.
    fn fail(&self, err: StoreError, fallback: &str) -> StoreError {
        let message = match &err {
            StoreError::Validation(detail) if !detail.is_empty() => detail.clone(),
            StoreError::NotFound | StoreError::AuthorizationRequired | StoreError::InvalidPage => {
                err.to_string()
            }
            _ => fallback.to_string(),
        };
        self.settle_err(message);
        err
    }

    /// Gate for mutating operations: reject locally when the session is
    /// not authenticated, before any network activity.
    fn authorize(&self, message: &str) -> Result<(), StoreError> {
        if self.session.is_authenticated() {
            return Ok(());
        }
        self.settle_err(message.to_string());
        Err(StoreError::AuthorizationRequired)
    }
}
