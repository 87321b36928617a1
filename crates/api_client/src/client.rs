//! Items API HTTP client.
//!
//! Async reqwest client covering the full surface: session endpoints
//! (register, login, me) and item CRUD including bulk delete.

use std::time::Duration;

use curio_model::{
    BulkDeleteOutcome, BulkDeleteRequest, Item, ItemDraft, ItemId, ItemPatch, Page,
    RegisterRequest, TokenResponse, User, UserId,
};

use crate::auth::{load_credentials, Credentials};

/// Items API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

/// Error type for API operations.
#[derive(Debug)]
pub enum ApiError {
    /// No auth credentials configured
    NotAuthenticated,
    /// Network error (connect, timeout, body read)
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// Server returned a validation error (400/422 with a detail message)
    Validation(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotAuthenticated => write!(f, "Not authenticated — run `curio login` first"),
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ApiError::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiClient {
    /// Create a new client using saved credentials.
    pub fn from_saved_credentials() -> Result<Self, ApiError> {
        let creds = load_credentials().ok_or(ApiError::NotAuthenticated)?;
        Ok(Self::with_token(creds.api_base, creds.token))
    }

    /// Create an unauthenticated client (register/login only need this).
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::build(api_base.into(), None)
    }

    /// Create a client with an explicit bearer token.
    pub fn with_token(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self::build(api_base.into(), Some(token.into()))
    }

    /// Create a client from loaded credentials.
    pub fn from_credentials(creds: &Credentials) -> Self {
        Self::build(creds.api_base.clone(), Some(creds.token.clone()))
    }

    fn build(api_base: String, token: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(format!("curio/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self { http, api_base: api_base.trim_end_matches('/').to_string(), token }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    // ── Session endpoints ───────────────────────────────────────────

    /// Register a new account. No token required.
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, ApiError> {
        let url = format!("{}/auth/register", self.api_base);
        let resp = self.post_json(&url, req).await?;
        parse_json(resp).await
    }

    /// OAuth2 password-flow login. The server expects a form-encoded body
    /// with `username` and `password` fields.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = format!("{}/auth/login", self.api_base);
        let response = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = check_status(response).await?;
        parse_json(resp).await
    }

    /// Verify the current token and fetch the authenticated user.
    pub async fn me(&self) -> Result<User, ApiError> {
        let url = format!("{}/users/me", self.api_base);
        let resp = self.get(&url).await?;
        parse_json(resp).await
    }

    // ── Item endpoints ──────────────────────────────────────────────

    /// List one page of items, optionally filtered by owner.
    pub async fn list_items(
        &self,
        page: u32,
        limit: u32,
        owner_id: Option<UserId>,
    ) -> Result<Page<Item>, ApiError> {
        let mut url = format!("{}/items?page={}&limit={}", self.api_base, page, limit);
        if let Some(owner) = owner_id {
            url.push_str(&format!("&owner_id={}", owner));
        }
        let resp = self.get(&url).await?;
        parse_json(resp).await
    }

    /// Fetch a single item by id.
    pub async fn get_item(&self, id: ItemId) -> Result<Item, ApiError> {
        let url = format!("{}/items/{}", self.api_base, id);
        let resp = self.get(&url).await?;
        parse_json(resp).await
    }

    /// Create an item. Requires a bearer token.
    pub async fn create_item(&self, draft: &ItemDraft) -> Result<Item, ApiError> {
        let url = format!("{}/items", self.api_base);
        let resp = self.post_json(&url, draft).await?;
        parse_json(resp).await
    }

    /// Update an item. Requires a bearer token.
    pub async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ApiError> {
        let url = format!("{}/items/{}", self.api_base, id);
        tracing::debug!(%url, "PUT");
        let response = self
            .authed(self.http.put(&url))
            .json(patch)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = check_status(response).await?;
        parse_json(resp).await
    }

    /// Delete an item. Requires a bearer token. Success has no body.
    pub async fn delete_item(&self, id: ItemId) -> Result<(), ApiError> {
        let url = format!("{}/items/{}", self.api_base, id);
        tracing::debug!(%url, "DELETE");
        let response = self
            .authed(self.http.delete(&url))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }

    /// Delete multiple items in one request. The server reports per-id
    /// success and failure; a non-2xx response is an error here.
    pub async fn bulk_delete(&self, ids: &[ItemId]) -> Result<BulkDeleteOutcome, ApiError> {
        let url = format!("{}/items/bulk-delete", self.api_base);
        let body = BulkDeleteRequest { ids: ids.to_vec() };
        let resp = self.post_json(&url, &body).await?;
        parse_json(resp).await
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(url, "GET");
        let response = self
            .authed(self.http.get(url))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(url, "POST");
        let response = self
            .authed(self.http.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await
    }
}

// ── Free functions ──────────────────────────────────────────────────

/// Map a non-2xx response to the error taxonomy. 400/422 become
/// `Validation` with the body's `detail` field when present; everything
/// else keeps its status code.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body);
    tracing::warn!(status, %detail, "request failed");
    if status == 422 || status == 400 {
        return Err(ApiError::Validation(detail));
    }
    Err(ApiError::Http(status, detail))
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| ApiError::Parse(e.to_string()))
}

/// Pull the human-readable `detail` out of an error body, falling back to
/// the raw body text.
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_prefers_detail_field() {
        let body = r#"{"detail":"Item not found"}"#;
        assert_eq!(extract_detail(body), "Item not found");
    }

    #[test]
    fn test_extract_detail_falls_back_to_raw_body() {
        assert_eq!(extract_detail("gateway exploded"), "gateway exploded");
        // detail present but not a string → raw body
        let body = r#"{"detail":[{"loc":["title"],"msg":"too short"}]}"#;
        assert_eq!(extract_detail(body), body);
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Http(500, "internal".into());
        assert_eq!(err.to_string(), "HTTP 500: internal");

        let err = ApiError::Validation("title must not be empty".into());
        assert_eq!(err.to_string(), "title must not be empty");

        let err = ApiError::NotAuthenticated;
        assert!(err.to_string().contains("curio login"));
    }

    #[test]
    fn test_api_base_trailing_slash_is_trimmed() {
        let client = ApiClient::new("https://items.example.com/api/v1/");
        assert_eq!(client.api_base(), "https://items.example.com/api/v1");
    }
}
