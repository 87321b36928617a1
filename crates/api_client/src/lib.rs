//! Items API client — shared between the store and the CLI.
//!
//! This crate is the single place that knows the server's URL layout,
//! status-code conventions, and the credential file on disk. It exposes
//! an async `ApiClient` over reqwest and nothing else.
//!
//! No caching. No retries. No UI concepts.

mod auth;
mod client;

pub use auth::{
    auth_file_path, delete_credentials, load_credentials, save_credentials, Credentials,
};
pub use client::{ApiClient, ApiError};
