//! In-Memory Backends
//!
//! Map-backed implementations of the storage traits. They carry the
//! full query semantics (visibility, field filters, ordering) so the
//! service layer behaves identically when a durable backend is swapped
//! in.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::models::{Document, Session, User};

use super::{DocumentStore, ListFilter, SessionStore, UserStore};

// == Document Store ==
/// Documents keyed by id.
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<String, Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn save(&self, doc: Document) -> Result<(), StoreError> {
        self.docs.write().insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.docs.read().get(id).cloned())
    }

    async fn list(
        &self,
        requester: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Document>, StoreError> {
        let docs = self.docs.read();

        let mut visible: Vec<Document> = docs
            .values()
            .filter(|doc| doc.readable_by(requester))
            .filter(|doc| filter.login.is_empty() || doc.owner_login == filter.login)
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();

        // Deterministic order so identical queries cache identically
        visible.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        if filter.limit > 0 {
            visible.truncate(filter.limit);
        }

        Ok(visible)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self.docs.write().remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

// == Session Store ==
/// Sessions keyed by token.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> Result<(), StoreError> {
        self.sessions.write().insert(session.token.clone(), session);
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().get(token).cloned())
    }

    async fn delete(&self, token: &str) -> Result<(), StoreError> {
        self.sessions.write().remove(token);
        Ok(())
    }
}

// == User Store ==
struct UserTable {
    users: HashMap<String, User>,
    next_id: i64,
}

/// Users keyed by login, ids handed out sequentially.
pub struct MemoryUserStore {
    table: RwLock<UserTable>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(UserTable {
                users: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, login: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut table = self.table.write();

        if table.users.contains_key(login) {
            return Err(StoreError::Conflict(format!(
                "Login '{}' is already taken",
                login
            )));
        }

        let user = User {
            id: table.next_id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        table.next_id += 1;
        table.users.insert(login.to_string(), user.clone());

        Ok(user)
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        Ok(self.table.read().users.get(login).cloned())
    }
}
