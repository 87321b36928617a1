//! Resource store — the client-side source of truth for one page of the
//! server's items collection.
//!
//! The store holds exactly one fetched page at a time and reconciles it
//! after every mutation: wholesale replacement on fetch, prepend on
//! create, in-place swap on update, prune by id on delete and bulk
//! delete. Alongside each call's own `Result`, the store maintains an
//! observable `loading`/`error` status channel with last-write-wins
//! semantics across overlapping operations.
//!
//! The network and the session live behind the [`ItemTransport`] and
//! [`SessionProvider`] traits, so the whole store is testable with a spy
//! transport and a canned session.

mod error;
mod store;
mod transport;

pub use error::StoreError;
pub use store::{PageMeta, ResourceStore};
pub use transport::{ItemTransport, Session, SessionProvider};
