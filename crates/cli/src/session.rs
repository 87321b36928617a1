//! Session wiring: saved credentials → client + session provider.

use std::sync::Arc;

use curio_api_client::{load_credentials, ApiClient};
use curio_model::UserId;
use curio_store::{ResourceStore, SessionProvider};

/// Session backed by the credentials file. Reads are performed on every
/// call rather than cached, so a logout (or an expired file) is picked
/// up by the next mutating operation.
pub struct FileSession;

impl SessionProvider for FileSession {
    fn is_authenticated(&self) -> bool {
        load_credentials().is_some()
    }

    fn current_user_id(&self) -> Option<UserId> {
        load_credentials().and_then(|c| c.user_id)
    }
}

/// Pick the API base: explicit flag first, then saved credentials.
pub fn resolve_api_base(flag: Option<String>) -> Result<String, String> {
    if let Some(base) = flag {
        return Ok(base);
    }
    load_credentials()
        .map(|c| c.api_base)
        .ok_or_else(|| "No API base configured — pass --api-base or log in first".to_string())
}

/// Build a client against the resolved API base, attaching the saved
/// token when one exists.
pub fn make_client(api_base_flag: Option<String>) -> Result<ApiClient, String> {
    let api_base = resolve_api_base(api_base_flag)?;
    Ok(match load_credentials() {
        Some(creds) if creds.api_base == api_base => ApiClient::from_credentials(&creds),
        _ => ApiClient::new(api_base),
    })
}

/// Build the resource store over the real transport and file session.
pub fn make_store(api_base_flag: Option<String>) -> Result<ResourceStore, String> {
    let client = make_client(api_base_flag)?;
    Ok(ResourceStore::new(Arc::new(client), Arc::new(FileSession)))
}
