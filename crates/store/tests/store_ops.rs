//! Store behavior against a spy transport: cache reconciliation,
//! authorization gating, status signals, and bulk-delete partial
//! failure semantics.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use curio_api_client::ApiError;
use curio_model::{BulkDeleteOutcome, Item, ItemDraft, ItemId, ItemPatch, Page, UserId};
use curio_store::{ItemTransport, ResourceStore, Session, StoreError};

// ── Spy transport ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List { page: u32, limit: u32, owner: Option<UserId> },
    Get(ItemId),
    Create,
    Update(ItemId),
    Delete(ItemId),
    BulkDelete(Vec<ItemId>),
}

/// Records every call and replays one scripted result per method.
#[derive(Default)]
struct SpyTransport {
    calls: Mutex<Vec<Call>>,
    list_result: Mutex<Option<Result<Page<Item>, ApiError>>>,
    get_result: Mutex<Option<Result<Item, ApiError>>>,
    create_result: Mutex<Option<Result<Item, ApiError>>>,
    update_result: Mutex<Option<Result<Item, ApiError>>>,
    delete_result: Mutex<Option<Result<(), ApiError>>>,
    bulk_result: Mutex<Option<Result<BulkDeleteOutcome, ApiError>>>,
}

impl SpyTransport {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

fn unscripted<T>() -> Result<T, ApiError> {
    Err(ApiError::Network("unscripted spy call".into()))
}

#[async_trait::async_trait]
impl ItemTransport for SpyTransport {
    async fn list(
        &self,
        page: u32,
        limit: u32,
        owner_id: Option<UserId>,
    ) -> Result<Page<Item>, ApiError> {
        self.record(Call::List { page, limit, owner: owner_id });
        self.list_result.lock().take().unwrap_or_else(unscripted)
    }

    async fn get(&self, id: ItemId) -> Result<Item, ApiError> {
        self.record(Call::Get(id));
        self.get_result.lock().take().unwrap_or_else(unscripted)
    }

    async fn create(&self, _draft: &ItemDraft) -> Result<Item, ApiError> {
        self.record(Call::Create);
        self.create_result.lock().take().unwrap_or_else(unscripted)
    }

    async fn update(&self, id: ItemId, _patch: &ItemPatch) -> Result<Item, ApiError> {
        self.record(Call::Update(id));
        self.update_result.lock().take().unwrap_or_else(unscripted)
    }

    async fn delete(&self, id: ItemId) -> Result<(), ApiError> {
        self.record(Call::Delete(id));
        self.delete_result.lock().take().unwrap_or_else(unscripted)
    }

    async fn bulk_delete(&self, ids: &[ItemId]) -> Result<BulkDeleteOutcome, ApiError> {
        self.record(Call::BulkDelete(ids.to_vec()));
        self.bulk_result.lock().take().unwrap_or_else(unscripted)
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

fn item(id: ItemId, title: &str) -> Item {
    Item {
        id,
        title: title.to_string(),
        description: None,
        owner_id: 3,
        created_at: Utc.with_ymd_and_hms(2025, 6, 15, 14, 30, 0).unwrap(),
        updated_at: None,
    }
}

fn page_of(items: Vec<Item>, page: u32, limit: u32, total: u64) -> Page<Item> {
    let pages = curio_model::page_count(total, limit);
    Page { items, total, page, limit, pages }
}

fn store_with(spy: Arc<SpyTransport>, authed: bool) -> ResourceStore {
    let session = if authed { Session::authenticated(3) } else { Session::anonymous() };
    ResourceStore::new(spy, Arc::new(session))
}

/// Seed the cache through a scripted fetch.
async fn seed(store: &ResourceStore, spy: &SpyTransport, items: Vec<Item>) {
    let total = items.len() as u64;
    *spy.list_result.lock() = Some(Ok(page_of(items, 1, 10, total)));
    store.fetch_page(1, 10, None).await.unwrap();
}

// ── Fetch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_page_replaces_cache_and_meta() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);

    *spy.list_result.lock() = Some(Ok(page_of(vec![item(1, "A"), item(2, "B")], 2, 10, 25)));
    let fetched = store.fetch_page(2, 10, Some(3)).await.unwrap();

    assert_eq!(fetched.items.len(), 2);
    assert_eq!(store.items().len(), 2);
    let meta = store.meta();
    assert_eq!(meta.page, 2);
    assert_eq!(meta.total, 25);
    assert_eq!(meta.pages, 3);
    assert!(!store.loading());
    assert!(store.error().is_none());
    assert_eq!(spy.calls(), vec![Call::List { page: 2, limit: 10, owner: Some(3) }]);
}

#[tokio::test]
async fn fetch_page_failure_preserves_previous_cache() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);
    seed(&store, &spy, vec![item(1, "A"), item(2, "B")]).await;

    *spy.list_result.lock() = Some(Err(ApiError::Network("connection refused".into())));
    let err = store.fetch_page(2, 10, None).await.unwrap_err();

    assert!(matches!(err, StoreError::Transport(_)));
    // Previous page still cached, generic message on the signal
    assert_eq!(store.items().len(), 2);
    assert_eq!(store.error().as_deref(), Some("Error fetching items"));
    assert!(!store.loading());
}

#[tokio::test]
async fn fetch_page_rejects_zero_page_locally() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);

    let err = store.fetch_page(0, 10, None).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidPage));
    let err = store.fetch_page(1, 0, None).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidPage));

    assert!(spy.calls().is_empty());
    assert!(!store.loading());
    assert!(store.error().is_some());
}

#[tokio::test]
async fn fetch_page_surfaces_validation_detail_verbatim() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);

    *spy.list_result.lock() = Some(Err(ApiError::Validation("limit must be <= 100".into())));
    let err = store.fetch_page(1, 200, None).await.unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.error().as_deref(), Some("limit must be <= 100"));
}

// ── Read-through get ────────────────────────────────────────────────

#[tokio::test]
async fn get_one_does_not_touch_cache() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);
    seed(&store, &spy, vec![item(1, "A")]).await;

    *spy.get_result.lock() = Some(Ok(item(99, "Elsewhere")));
    let fetched = store.get_one(99).await.unwrap();

    assert_eq!(fetched.id, 99);
    // Cache unchanged: still just item 1
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].id, 1);
}

#[tokio::test]
async fn get_one_missing_id_is_not_found() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);

    *spy.get_result.lock() = Some(Err(ApiError::Http(404, "Item not found".into())));
    let err = store.get_one(404).await.unwrap_err();

    assert!(matches!(err, StoreError::NotFound));
    assert_eq!(store.error().as_deref(), Some("Item not found"));
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_prepends_to_cache() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);
    seed(&store, &spy, vec![item(1, "A"), item(2, "B")]).await;

    *spy.create_result.lock() = Some(Ok(item(3, "C")));
    let created = store.create(&ItemDraft::new("C")).await.unwrap();

    assert_eq!(created.id, 3);
    let ids: Vec<_> = store.items().iter().map(|it| it.id).collect();
    // Prepended; the page now conceptually holds limit + 1 records until
    // the next fetch
    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn create_unauthenticated_rejects_without_transport_call() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);

    let err = store.create(&ItemDraft::new("C")).await.unwrap_err();

    assert!(matches!(err, StoreError::AuthorizationRequired));
    assert!(spy.calls().is_empty());
    assert!(store.items().is_empty());
    assert_eq!(store.error().as_deref(), Some("You must be logged in to create an item"));
    assert!(!store.loading());
}

#[tokio::test]
async fn create_failure_leaves_cache_unchanged() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);
    seed(&store, &spy, vec![item(1, "A")]).await;

    *spy.create_result.lock() = Some(Err(ApiError::Validation("title too short".into())));
    let err = store.create(&ItemDraft::new("")).await.unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.error().as_deref(), Some("title too short"));
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn update_swaps_record_in_place() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);
    seed(&store, &spy, vec![item(1, "A"), item(2, "B")]).await;

    *spy.update_result.lock() = Some(Ok(item(2, "C")));
    let patch = ItemPatch { title: Some("C".into()), description: None };
    store.update(2, &patch).await.unwrap();

    let titles: Vec<_> = store.items().iter().map(|it| it.title.clone()).collect();
    assert_eq!(titles, vec!["A", "C"]);
}

#[tokio::test]
async fn update_of_uncached_id_leaves_cache_unchanged() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);
    seed(&store, &spy, vec![item(1, "A")]).await;

    *spy.update_result.lock() = Some(Ok(item(50, "Other page")));
    store.update(50, &ItemPatch::default()).await.unwrap();

    let ids: Vec<_> = store.items().iter().map(|it| it.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn update_unauthenticated_rejects_locally() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);

    let err = store.update(1, &ItemPatch::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::AuthorizationRequired));
    assert!(spy.calls().is_empty());
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_prunes_cache() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);
    seed(&store, &spy, vec![item(1, "A"), item(2, "B")]).await;

    *spy.delete_result.lock() = Some(Ok(()));
    store.delete(1).await.unwrap();

    let ids: Vec<_> = store.items().iter().map(|it| it.id).collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn delete_of_uncached_id_still_calls_transport() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);
    seed(&store, &spy, vec![item(1, "A")]).await;

    *spy.delete_result.lock() = Some(Ok(()));
    store.delete(42).await.unwrap();

    assert!(spy.calls().contains(&Call::Delete(42)));
    assert_eq!(store.items().len(), 1);
}

// ── Bulk delete ─────────────────────────────────────────────────────

#[tokio::test]
async fn delete_many_empty_is_a_no_op() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);

    let outcome = store.delete_many(&[]).await.unwrap();

    assert!(outcome.is_empty());
    assert!(spy.calls().is_empty());
    assert!(!store.loading());
    assert!(store.error().is_none());
}

#[tokio::test]
async fn delete_many_unauthenticated_rejects_before_any_network() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);

    let err = store.delete_many(&[1, 2]).await.unwrap_err();

    assert!(matches!(err, StoreError::AuthorizationRequired));
    assert!(spy.calls().is_empty());
    assert_eq!(store.error().as_deref(), Some("You must be logged in to delete items"));
}

#[tokio::test]
async fn delete_many_partial_failure_prunes_only_deleted_ids() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);
    seed(&store, &spy, vec![item(1, "A"), item(2, "B"), item(3, "C")]).await;

    *spy.bulk_result.lock() =
        Some(Ok(BulkDeleteOutcome { deleted_ids: vec![1, 2], failed_ids: vec![3] }));
    let outcome = store.delete_many(&[1, 2, 3]).await.unwrap();

    assert_eq!(outcome.deleted_ids, vec![1, 2]);
    assert_eq!(outcome.failed_ids, vec![3]);
    // Partial success is preserved, not rolled back
    let ids: Vec<_> = store.items().iter().map(|it| it.id).collect();
    assert_eq!(ids, vec![3]);
    assert_eq!(
        store.error().as_deref(),
        Some("Failed to delete 1 items. 2 items were deleted successfully.")
    );
    assert!(!store.loading());
}

#[tokio::test]
async fn delete_many_full_success_clears_error() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);
    seed(&store, &spy, vec![item(1, "A"), item(2, "B")]).await;

    *spy.bulk_result.lock() =
        Some(Ok(BulkDeleteOutcome { deleted_ids: vec![1, 2], failed_ids: vec![] }));
    let outcome = store.delete_many(&[1, 2]).await.unwrap();

    assert_eq!(outcome.deleted_ids, vec![1, 2]);
    assert!(store.items().is_empty());
    assert!(store.error().is_none());
}

#[tokio::test]
async fn delete_many_transport_failure_reports_all_failed_without_pruning() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), true);
    seed(&store, &spy, vec![item(1, "A"), item(2, "B"), item(3, "C")]).await;

    *spy.bulk_result.lock() = Some(Err(ApiError::Http(500, "internal".into())));
    let outcome = store.delete_many(&[1, 2, 3]).await.unwrap();

    // Resolves rather than raising: every requested id reported failed
    assert!(outcome.deleted_ids.is_empty());
    assert_eq!(outcome.failed_ids, vec![1, 2, 3]);
    assert_eq!(store.items().len(), 3);
    assert_eq!(store.error().as_deref(), Some("Error processing bulk item deletions"));
    assert!(!store.loading());
}

// ── Status channel ──────────────────────────────────────────────────

#[tokio::test]
async fn new_operation_clears_previous_error() {
    let spy = Arc::new(SpyTransport::default());
    let store = store_with(spy.clone(), false);

    *spy.list_result.lock() = Some(Err(ApiError::Network("down".into())));
    let _ = store.fetch_page(1, 10, None).await;
    assert!(store.error().is_some());

    *spy.list_result.lock() = Some(Ok(page_of(vec![], 1, 10, 0)));
    store.fetch_page(1, 10, None).await.unwrap();
    assert!(store.error().is_none());
}

#[tokio::test]
async fn loading_is_false_after_every_exit_path() {
    let spy = Arc::new(SpyTransport::default());
    let authed = store_with(spy.clone(), true);
    let anon = store_with(spy.clone(), false);

    // Success path
    *spy.list_result.lock() = Some(Ok(page_of(vec![], 1, 10, 0)));
    authed.fetch_page(1, 10, None).await.unwrap();
    assert!(!authed.loading());

    // Transport failure path
    *spy.get_result.lock() = Some(Err(ApiError::Network("down".into())));
    let _ = authed.get_one(1).await;
    assert!(!authed.loading());

    // Local authorization failure path
    let _ = anon.delete(1).await;
    assert!(!anon.loading());

    // Local validation failure path
    let _ = authed.fetch_page(0, 10, None).await;
    assert!(!authed.loading());
}
