//! Storage Module
//!
//! Persistence seams consumed by the services, plus the shipped
//! in-process backends. A SQL or object-store backend would implement
//! the same traits.

mod files;
mod memory;

pub use files::LocalFileStore;
pub use memory::{MemoryDocumentStore, MemorySessionStore, MemoryUserStore};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Document, Session, User};

// == List Filter ==
/// Field filter for document listings.
///
/// Empty strings mean "unfiltered"; `limit == 0` means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Restrict to documents owned by this login
    pub login: String,
    /// Field to filter on, one of [`FILTER_KEYS`]
    pub key: String,
    /// Value the filtered field must equal
    pub value: String,
    /// Maximum number of documents returned, 0 = unbounded
    pub limit: usize,
}

/// Fields a list query may filter on.
pub const FILTER_KEYS: &[&str] = &["name", "mime", "public", "file"];

impl ListFilter {
    /// Validates the filter before cache or store are touched.
    ///
    /// Returns an error message for an unknown filter key, or for a
    /// non-boolean value on a boolean field; None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return None;
        }
        if !FILTER_KEYS.contains(&self.key.as_str()) {
            return Some(format!("Unknown filter key: {}", self.key));
        }
        if matches!(self.key.as_str(), "public" | "file") && self.value.parse::<bool>().is_err() {
            return Some(format!("Filter value for '{}' must be a boolean", self.key));
        }
        None
    }

    /// True when the document matches the field filter. An empty key
    /// matches everything.
    pub fn matches(&self, doc: &Document) -> bool {
        match self.key.as_str() {
            "" => true,
            "name" => doc.name == self.value,
            "mime" => doc.mime == self.value,
            "public" => Some(doc.public) == self.value.parse().ok(),
            "file" => Some(doc.is_file) == self.value.parse().ok(),
            _ => false,
        }
    }
}

// == Session Store ==
/// Session persistence: tokens issued at login, resolved on every
/// document operation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a new session.
    async fn create(&self, session: Session) -> Result<(), StoreError>;

    /// Resolves a token to its session, `None` when the token is unknown.
    async fn get_by_token(&self, token: &str) -> Result<Option<Session>, StoreError>;

    /// Drops a session; an absent token is not an error.
    async fn delete(&self, token: &str) -> Result<(), StoreError>;
}

// == Document Store ==
/// Document metadata persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a new document.
    async fn save(&self, doc: Document) -> Result<(), StoreError>;

    /// Fetches a document by id, `None` when the id is unknown.
    async fn get_by_id(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// Lists documents visible to `requester`, narrowed by `filter`.
    ///
    /// The requester's visibility (owner, public, or grant) is part of
    /// the query predicate, not applied afterwards. The result is ordered
    /// by name, then id, so identical queries produce identical
    /// sequences.
    async fn list(&self, requester: &str, filter: &ListFilter)
        -> Result<Vec<Document>, StoreError>;

    /// Deletes a document; an absent id surfaces [`StoreError::NotFound`].
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

// == User Store ==
/// Registered-user persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user and assigns its id. A duplicate login
    /// surfaces [`StoreError::Conflict`].
    async fn create(&self, login: &str, password_hash: &str) -> Result<User, StoreError>;

    /// Fetches a user by login, `None` when the login is unknown.
    async fn get_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;
}

// == File Store ==
/// Binary payload persistence.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persists payload bytes under a name, returning the stored path.
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, StoreError>;

    /// Reads payload bytes back from a path previously returned by
    /// `save`.
    async fn read(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Removes a stored payload.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}
