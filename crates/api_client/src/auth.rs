//! Credential storage.
//!
//! Reads/writes ~/.config/curio/auth.json (0600 on Unix). A token saved
//! by `curio login` is picked up by every later invocation until
//! `curio logout` removes the file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Credentials stored locally after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token for the items API
    pub token: String,
    /// API base URL (e.g., "https://items.example.com/api/v1")
    pub api_base: String,
    /// Authenticated user id (for display and owner filtering)
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Authenticated user email (for display)
    #[serde(default)]
    pub email: Option<String>,
}

impl Credentials {
    pub fn new(token: String, api_base: String) -> Self {
        Self { token, api_base, user_id: None, email: None }
    }
}

/// Returns the path to the credentials file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("curio/auth.json"))
}

/// Load saved credentials from disk.
/// Returns None if nothing is saved or the file is invalid.
pub fn load_credentials() -> Option<Credentials> {
    let path = auth_file_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save credentials to disk.
/// Creates the parent directory if it doesn't exist.
/// Sets 0600 permissions on Unix.
pub fn save_credentials(creds: &Credentials) -> Result<(), String> {
    let path = auth_file_path().ok_or("Could not determine config directory")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

    std::fs::write(&path, &contents).map_err(|e| format!("Failed to write auth file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Delete saved credentials (logout).
pub fn delete_credentials() -> Result<(), String> {
    let Some(path) = auth_file_path() else {
        return Ok(());
    };
    if path.exists() {
        std::fs::remove_file(&path).map_err(|e| format!("Failed to delete auth file: {}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_roundtrip() {
        let creds = Credentials {
            token: "test-token".into(),
            api_base: "https://items.example.com/api/v1".into(),
            user_id: Some(3),
            email: Some("alice@example.com".into()),
        };

        let json = serde_json::to_string_pretty(&creds).unwrap();
        let parsed: Credentials = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.token, "test-token");
        assert_eq!(parsed.api_base, "https://items.example.com/api/v1");
        assert_eq!(parsed.user_id, Some(3));
        assert_eq!(parsed.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_credentials_missing_optional_fields() {
        let json = r#"{"token":"tok","api_base":"https://items.example.com"}"#;
        let parsed: Credentials = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.token, "tok");
        assert!(parsed.user_id.is_none());
        assert!(parsed.email.is_none());
    }

    #[test]
    fn test_auth_file_path_exists() {
        let path = auth_file_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("curio"));
        assert!(path.to_string_lossy().contains("auth.json"));
    }

    #[test]
    fn test_save_and_load_in_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");

        // Manually write and read since save_credentials uses the real
        // config path
        let creds = Credentials::new("tok123".into(), "https://api.test".into());
        let json = serde_json::to_string_pretty(&creds).unwrap();
        std::fs::write(&path, &json).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: Credentials = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded.token, "tok123");
        assert_eq!(loaded.api_base, "https://api.test");
    }
}
