//! Document Model
//!
//! The stored document entity and its access rules.

use chrono::{DateTime, Utc};

// == Document ==
/// A stored document: metadata plus an optional binary payload on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Unique document id (UUID v4)
    pub id: String,
    /// Client-supplied document name
    pub name: String,
    /// MIME type reported at upload
    pub mime: String,
    /// True when a binary payload was uploaded alongside the metadata
    pub is_file: bool,
    /// True when the document is readable by everyone
    pub public: bool,
    /// Login of the owning user
    pub owner_login: String,
    /// Logins granted read access in addition to the owner
    pub grant: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Auxiliary JSON payload attached at upload
    pub json_data: Option<serde_json::Value>,
    /// Where the binary payload lives; `Some` only when `is_file` is true
    /// and a payload was supplied at creation. Never exposed to clients.
    pub file_path: Option<String>,
}

impl Document {
    // == Read Access ==
    /// A document is readable by everyone when public, and otherwise by
    /// its owner and the logins on its grant list.
    ///
    /// This is the single read rule for the whole service: the service
    /// gate and the store's list visibility predicate both call it, so the
    /// decision cannot diverge between the cache-hit and store-fetch
    /// paths.
    pub fn readable_by(&self, login: &str) -> bool {
        self.public || self.owner_login == login || self.grant.iter().any(|g| g == login)
    }

    // == Delete Access ==
    /// Only the owner may delete. Public visibility and grants do not
    /// confer delete rights.
    pub fn deletable_by(&self, login: &str) -> bool {
        self.owner_login == login
    }
}
