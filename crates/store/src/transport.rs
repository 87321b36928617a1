//! Collaborator traits: the transport and the session.
//!
//! The store never talks to reqwest directly; it goes through
//! [`ItemTransport`], which `ApiClient` implements below. Tests swap in
//! a spy. The session is read synchronously before every mutating call
//! and never cached by the store.

use async_trait::async_trait;
use curio_api_client::{ApiClient, ApiError};
use curio_model::{BulkDeleteOutcome, Item, ItemDraft, ItemId, ItemPatch, Page, UserId};

/// Async transport for the items collection.
#[async_trait]
pub trait ItemTransport: Send + Sync {
    async fn list(
        &self,
        page: u32,
        limit: u32,
        owner_id: Option<UserId>,
    ) -> Result<Page<Item>, ApiError>;

    async fn get(&self, id: ItemId) -> Result<Item, ApiError>;

    async fn create(&self, draft: &ItemDraft) -> Result<Item, ApiError>;

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ApiError>;

    async fn delete(&self, id: ItemId) -> Result<(), ApiError>;

    async fn bulk_delete(&self, ids: &[ItemId]) -> Result<BulkDeleteOutcome, ApiError>;
}

#[async_trait]
impl ItemTransport for ApiClient {
    async fn list(
        &self,
        page: u32,
        limit: u32,
        owner_id: Option<UserId>,
    ) -> Result<Page<Item>, ApiError> {
        self.list_items(page, limit, owner_id).await
    }

    async fn get(&self, id: ItemId) -> Result<Item, ApiError> {
        self.get_item(id).await
    }

    async fn create(&self, draft: &ItemDraft) -> Result<Item, ApiError> {
        self.create_item(draft).await
    }

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ApiError> {
        self.update_item(id, patch).await
    }

    async fn delete(&self, id: ItemId) -> Result<(), ApiError> {
        self.delete_item(id).await
    }

    async fn bulk_delete(&self, ids: &[ItemId]) -> Result<BulkDeleteOutcome, ApiError> {
        ApiClient::bulk_delete(self, ids).await
    }
}

/// Read-only view of the session consulted before each mutating call.
pub trait SessionProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;
    fn current_user_id(&self) -> Option<UserId>;
}

/// Plain session snapshot. The CLI builds one from saved credentials;
/// tests build whichever state they need.
#[derive(Debug, Clone, Default)]
pub struct Session {
    authenticated: bool,
    user_id: Option<UserId>,
}

impl Session {
    /// A logged-in session for the given user.
    pub fn authenticated(user_id: UserId) -> Self {
        Self { authenticated: true, user_id: Some(user_id) }
    }

    /// A session with no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionProvider for Session {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn current_user_id(&self) -> Option<UserId> {
        self.user_id
    }
}
