//! Items API wire contract — request/response types.
//!
//! This crate is the single source of truth for the shapes exchanged with
//! the items server: records, pagination envelopes, mutation payloads,
//! bulk-delete outcomes, and the session types (login/register/me).
//!
//! Serde structs only. No I/O, no HTTP, no business rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item identifier as assigned by the server.
pub type ItemId = i64;

/// User identifier as assigned by the server.
pub type UserId = i64;

// =============================================================================
// Items
// =============================================================================

/// A server-owned item record. Identity is by `id`; every other field is
/// payload as far as the store's invariants are concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating an item. The server fills in id, owner, and
/// timestamps from the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ItemDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), description: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update payload. Unset fields are omitted from the request body
/// so the server leaves them untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a server collection plus the pagination metadata that came
/// with it. Invariant (server-side, verified in tests here): when
/// `limit > 0`, `pages == ceil(total / limit)` and `items.len() <= limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
}

impl<T> Page<T> {
    /// An empty first page, used as the store's initial cache state.
    pub fn empty(limit: u32) -> Self {
        Self { items: Vec::new(), total: 0, page: 1, limit, pages: 0 }
    }
}

/// Page count for a collection of `total` records at `limit` per page.
pub fn page_count(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64) as u32
}

// =============================================================================
// Bulk delete
// =============================================================================

/// Request body for `POST /items/bulk-delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<ItemId>,
}

/// Per-id result of a bulk delete. `deleted_ids` and `failed_ids` are
/// disjoint; a total transport failure is represented as every requested
/// id failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkDeleteOutcome {
    #[serde(default)]
    pub deleted_ids: Vec<ItemId>,
    #[serde(default)]
    pub failed_ids: Vec<ItemId>,
}

impl BulkDeleteOutcome {
    /// Outcome for a request that never reached the server: nothing
    /// deleted, everything failed.
    pub fn all_failed(ids: &[ItemId]) -> Self {
        Self { deleted_ids: Vec::new(), failed_ids: ids.to_vec() }
    }

    pub fn is_empty(&self) -> bool {
        self.deleted_ids.is_empty() && self.failed_ids.is_empty()
    }
}

// =============================================================================
// Session
// =============================================================================

/// Authenticated user as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Registration payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Response from `POST /auth/login` (OAuth2 password flow).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}
