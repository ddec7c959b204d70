//! Document Service
//!
//! Orchestrates every document operation across the session store, the
//! document store, the file store and the cache. Authorization is
//! enforced here, after retrieval and before anything is returned or
//! cached, so a cache hit and a store fetch answer identically.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{keys, CachedValue, LfuCache};
use crate::error::{ApiError, Result};
use crate::models::{Document, DocumentMeta, Session};
use crate::storage::{DocumentStore, FileStore, ListFilter, SessionStore};

/// Where a resolved document came from. Only store-sourced copies are
/// written back to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentSource {
    Cache,
    Store,
}

// == Document Service ==
pub struct DocsService {
    docs: Arc<dyn DocumentStore>,
    sessions: Arc<dyn SessionStore>,
    files: Arc<dyn FileStore>,
    cache: Arc<LfuCache>,
}

impl DocsService {
    pub fn new(
        docs: Arc<dyn DocumentStore>,
        sessions: Arc<dyn SessionStore>,
        files: Arc<dyn FileStore>,
        cache: Arc<LfuCache>,
    ) -> Self {
        Self {
            docs,
            sessions,
            files,
            cache,
        }
    }

    // == Session Resolution ==
    /// Resolves a session token, or denies access. An absent or unknown
    /// token is always `AccessDenied`, never `NotFound`, so the error
    /// does not reveal whether the token ever existed.
    async fn resolve_session(&self, token: &str) -> Result<Session> {
        if token.is_empty() {
            return Err(ApiError::AccessDenied);
        }
        match self.sessions.get_by_token(token).await? {
            Some(session) => Ok(session),
            None => Err(ApiError::AccessDenied),
        }
    }

    // == Document Resolution ==
    /// Looks a document up in the cache, falling back to the store. The
    /// caller applies the read gate before using the result.
    async fn resolve_document(&self, id: &str) -> Result<(Document, DocumentSource)> {
        let key = keys::doc_key(id);

        if let Some(value) = self.cache.get(&key) {
            if let Some(doc) = value.as_document() {
                return Ok((doc.clone(), DocumentSource::Cache));
            }
            // A list under a doc key: drop it and fall through to the store
            warn!("Cache entry under '{}' has the wrong shape, discarding", key);
            self.cache.delete(&key);
        }

        match self.docs.get_by_id(id).await? {
            Some(doc) => Ok((doc, DocumentSource::Store)),
            None => Err(ApiError::NotFound(id.to_string())),
        }
    }

    // == Create ==
    /// Creates a document owned by the session's user.
    ///
    /// The binary payload (when `meta.file` is set) is persisted before
    /// the metadata, so a stored document never points at a missing
    /// file. The owner's cached listings are invalidated and the new
    /// document is cached under its `doc:` key.
    pub async fn create(
        &self,
        token: &str,
        meta: DocumentMeta,
        json_data: Option<serde_json::Value>,
        file_bytes: Option<Vec<u8>>,
    ) -> Result<Document> {
        let session = self.resolve_session(token).await?;

        if let Some(msg) = meta.validate() {
            return Err(ApiError::InvalidInput(msg));
        }

        let mut doc = Document {
            id: Uuid::new_v4().to_string(),
            name: meta.name,
            mime: if meta.mime.is_empty() {
                "application/json".to_string()
            } else {
                meta.mime
            },
            is_file: meta.file,
            public: meta.public,
            owner_login: session.login.clone(),
            grant: meta.grant,
            created_at: Utc::now(),
            json_data,
            file_path: None,
        };

        if doc.is_file {
            let bytes = file_bytes
                .ok_or_else(|| ApiError::InvalidInput("File part is missing".to_string()))?;
            let stored_name = format!("{}_{}", doc.id, doc.name);
            let path = self.files.save(&stored_name, &bytes).await?;
            doc.file_path = Some(path);
        }

        self.docs.save(doc.clone()).await?;

        // The new document changes every listing the owner can request
        self.cache.delete_prefix(&keys::list_prefix(&doc.owner_login));
        self.cache
            .set(keys::doc_key(&doc.id), CachedValue::Document(doc.clone()));

        info!("Created document {} for {}", doc.id, doc.owner_login);
        Ok(doc)
    }

    // == Get ==
    /// Fetches a single document, cache first.
    ///
    /// The read gate runs on whatever copy was resolved; a denied
    /// result is never cached, and only store-sourced copies are written
    /// back.
    pub async fn get(&self, token: &str, id: &str) -> Result<Document> {
        let session = self.resolve_session(token).await?;
        let (doc, source) = self.resolve_document(id).await?;

        if !doc.readable_by(&session.login) {
            return Err(ApiError::AccessDenied);
        }

        if source == DocumentSource::Store {
            self.cache
                .set(keys::doc_key(id), CachedValue::Document(doc.clone()));
        }

        Ok(doc)
    }

    // == List ==
    /// Lists documents visible to the session's user.
    ///
    /// The filter is validated before cache or store are consulted. A
    /// cached listing is returned verbatim; a miss queries the store and
    /// caches the result under the requester's `list:` key.
    pub async fn list(&self, token: &str, filter: ListFilter) -> Result<Vec<Document>> {
        let session = self.resolve_session(token).await?;

        if let Some(msg) = filter.validate() {
            return Err(ApiError::InvalidInput(msg));
        }

        let key = keys::list_key(
            &session.login,
            &filter.login,
            &filter.key,
            &filter.value,
            filter.limit,
        );

        if let Some(value) = self.cache.get(&key) {
            if let Some(docs) = value.as_document_list() {
                return Ok(docs.to_vec());
            }
            warn!("Cache entry under '{}' has the wrong shape, discarding", key);
            self.cache.delete(&key);
        }

        let docs = self.docs.list(&session.login, &filter).await?;
        self.cache.set(key, CachedValue::DocumentList(docs.clone()));

        Ok(docs)
    }

    // == Delete ==
    /// Deletes a document the session's user owns.
    ///
    /// Ownership is checked against a fresh store fetch, never a cached
    /// copy. File removal is best effort; the document's cache entry and
    /// the owner's listings are always invalidated.
    pub async fn delete(&self, token: &str, id: &str) -> Result<()> {
        let session = self.resolve_session(token).await?;

        let doc = match self.docs.get_by_id(id).await? {
            Some(doc) => doc,
            None => return Err(ApiError::NotFound(id.to_string())),
        };

        if !doc.deletable_by(&session.login) {
            return Err(ApiError::AccessDenied);
        }

        self.docs.delete(id).await?;

        if let Some(path) = &doc.file_path {
            if let Err(e) = self.files.delete(path).await {
                warn!("Failed to remove stored file '{}': {}", path, e);
            }
        }

        self.cache.delete(&keys::doc_key(id));
        self.cache.delete_prefix(&keys::list_prefix(&doc.owner_login));

        info!("Deleted document {} for {}", id, session.login);
        Ok(())
    }

    // == Payload ==
    /// Reads the binary payload of an already-authorized document.
    pub async fn read_payload(&self, doc: &Document) -> Result<Vec<u8>> {
        let path = doc
            .file_path
            .as_deref()
            .ok_or_else(|| ApiError::Internal(format!("Document {} has no stored file", doc.id)))?;
        Ok(self.files.read(path).await?)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalFileStore, MemoryDocumentStore, MemorySessionStore};
    use tempfile::TempDir;

    async fn test_service(capacity: usize) -> (DocsService, TempDir) {
        let dir = TempDir::new().unwrap();
        let files = LocalFileStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        let service = DocsService::new(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(MemorySessionStore::new()),
            Arc::new(files),
            Arc::new(LfuCache::new(capacity)),
        );
        (service, dir)
    }

    async fn open_session(service: &DocsService, login: &str) -> String {
        let token = format!("{}-token", login);
        service
            .sessions
            .create(Session {
                token: token.clone(),
                user_id: 1,
                login: login.to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        token
    }

    fn meta(name: &str) -> DocumentMeta {
        DocumentMeta {
            name: name.to_string(),
            file: false,
            public: false,
            mime: String::new(),
            grant: Vec::new(),
            token: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_requires_a_session() {
        let (service, _dir) = test_service(10).await;

        let err = service
            .create("no-such-token", meta("notes"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));

        let err = service.create("", meta("notes"), None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let payload = serde_json::json!({"answer": 42});
        let created = service
            .create(&token, meta("notes"), Some(payload.clone()), None)
            .await
            .unwrap();

        assert_eq!(created.owner_login, "alice");
        assert_eq!(created.mime, "application/json");
        assert!(!created.is_file);

        let fetched = service.get(&token, &created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.json_data, Some(payload));
    }

    #[tokio::test]
    async fn test_create_caches_the_document() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let created = service.create(&token, meta("notes"), None, None).await.unwrap();

        // The first get must be a cache hit
        service.get(&token, &created.id).await.unwrap();
        assert_eq!(service.cache.stats().hits, 1);
        assert_eq!(service.cache.stats().misses, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_meta() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let err = service.create(&token, meta(""), None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_create_file_without_payload_is_invalid() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let mut file_meta = meta("photo.png");
        file_meta.file = true;
        file_meta.mime = "image/png".to_string();

        let err = service.create(&token, file_meta, None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let err = service.get(&token, "missing").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_gate_applies_on_hit_and_on_store_fetch() {
        let (service, _dir) = test_service(10).await;
        let alice = open_session(&service, "alice").await;
        let bob = open_session(&service, "bob").await;

        let private = service.create(&alice, meta("secret"), None, None).await.unwrap();

        // Cached by create: this denial comes from the cache-hit path
        let err = service.get(&bob, &private.id).await.unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));

        // Drop the cached copy: same denial from the store-fetch path
        service.cache.delete(&keys::doc_key(&private.id));
        let err = service.get(&bob, &private.id).await.unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));
    }

    #[tokio::test]
    async fn test_denied_store_fetch_is_not_cached() {
        let (service, _dir) = test_service(10).await;
        let alice = open_session(&service, "alice").await;
        let bob = open_session(&service, "bob").await;

        let private = service.create(&alice, meta("secret"), None, None).await.unwrap();
        service.cache.delete(&keys::doc_key(&private.id));

        let _ = service.get(&bob, &private.id).await.unwrap_err();
        assert_eq!(service.cache.len(), 0);

        // The owner's next get must go back to the store
        service.get(&alice, &private.id).await.unwrap();
        assert_eq!(service.cache.stats().misses, 2);
    }

    #[tokio::test]
    async fn test_public_and_granted_documents_are_readable() {
        let (service, _dir) = test_service(10).await;
        let alice = open_session(&service, "alice").await;
        let bob = open_session(&service, "bob").await;
        let carol = open_session(&service, "carol").await;

        let mut public_meta = meta("announcement");
        public_meta.public = true;
        let public = service.create(&alice, public_meta, None, None).await.unwrap();

        let mut granted_meta = meta("shared");
        granted_meta.grant.push("bob".to_string());
        let granted = service.create(&alice, granted_meta, None, None).await.unwrap();

        assert!(service.get(&bob, &public.id).await.is_ok());
        assert!(service.get(&carol, &public.id).await.is_ok());

        assert!(service.get(&bob, &granted.id).await.is_ok());
        let err = service.get(&carol, &granted.id).await.unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));
    }

    #[tokio::test]
    async fn test_get_refetches_after_eviction() {
        let (service, _dir) = test_service(1).await;
        let token = open_session(&service, "alice").await;

        let first = service.create(&token, meta("first"), None, None).await.unwrap();
        let second = service.create(&token, meta("second"), None, None).await.unwrap();

        // Capacity 1: creating the second evicted the first
        assert_eq!(service.cache.len(), 1);
        let fetched = service.get(&token, &first.id).await.unwrap();
        assert_eq!(fetched, first);
        assert_eq!(service.cache.stats().misses, 1);

        let fetched = service.get(&token, &second.id).await.unwrap();
        assert_eq!(fetched, second);
    }

    #[tokio::test]
    async fn test_list_requires_a_session_before_validation() {
        let (service, _dir) = test_service(10).await;

        let bad_filter = ListFilter {
            key: "bogus".to_string(),
            value: "x".to_string(),
            ..Default::default()
        };
        let err = service.list("no-such-token", bad_filter).await.unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));
    }

    #[tokio::test]
    async fn test_list_validates_filter_before_cache_and_store() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let bad_filter = ListFilter {
            key: "bogus".to_string(),
            value: "x".to_string(),
            ..Default::default()
        };
        let err = service.list(&token, bad_filter).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        // Rejected before the cache was touched
        let stats = service.cache.stats();
        assert_eq!(stats.hits + stats.misses, 0);
    }

    #[tokio::test]
    async fn test_list_caches_query_results() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        service.create(&token, meta("one"), None, None).await.unwrap();
        service.create(&token, meta("two"), None, None).await.unwrap();

        let first = service.list(&token, ListFilter::default()).await.unwrap();
        let misses_after_first = service.cache.stats().misses;

        let second = service.list(&token, ListFilter::default()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(service.cache.stats().misses, misses_after_first);
        assert!(service.cache.stats().hits >= 1);
    }

    #[tokio::test]
    async fn test_create_invalidates_the_owners_cached_listings() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        service.create(&token, meta("first"), None, None).await.unwrap();
        let before = service.list(&token, ListFilter::default()).await.unwrap();
        assert_eq!(before.len(), 1);

        service.create(&token, meta("second"), None, None).await.unwrap();
        let after = service.list(&token, ListFilter::default()).await.unwrap();
        assert_eq!(after.len(), 2);
    }

    #[tokio::test]
    async fn test_list_invalidation_is_scoped_to_the_owner() {
        let (service, _dir) = test_service(10).await;
        let alice = open_session(&service, "alice").await;
        let bob = open_session(&service, "bob").await;

        let mut public_meta = meta("first");
        public_meta.public = true;
        service.create(&alice, public_meta, None, None).await.unwrap();

        let seen_by_bob = service.list(&bob, ListFilter::default()).await.unwrap();
        assert_eq!(seen_by_bob.len(), 1);

        // Another public document: bob's cached listing is not touched
        // and stays stale until it is evicted
        let mut public_meta = meta("second");
        public_meta.public = true;
        service.create(&alice, public_meta, None, None).await.unwrap();

        let seen_by_bob = service.list(&bob, ListFilter::default()).await.unwrap();
        assert_eq!(seen_by_bob.len(), 1);

        // The owner sees both immediately
        let seen_by_alice = service.list(&alice, ListFilter::default()).await.unwrap();
        assert_eq!(seen_by_alice.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let (service, _dir) = test_service(10).await;
        let alice = open_session(&service, "alice").await;
        let bob = open_session(&service, "bob").await;

        let mut shared_meta = meta("shared");
        shared_meta.public = true;
        shared_meta.grant.push("bob".to_string());
        let doc = service.create(&alice, shared_meta, None, None).await.unwrap();

        // Readable is not deletable
        assert!(service.get(&bob, &doc.id).await.is_ok());
        let err = service.delete(&bob, &doc.id).await.unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));

        service.delete(&alice, &doc.id).await.unwrap();
        let err = service.get(&alice, &doc.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_consults_the_store_not_the_cache() {
        let (service, _dir) = test_service(10).await;
        let alice = open_session(&service, "alice").await;

        let doc = service.create(&alice, meta("notes"), None, None).await.unwrap();

        // Remove from the store behind the service's back; the cached
        // copy must not make the delete succeed
        service.docs.delete(&doc.id).await.unwrap();
        let err = service.delete(&alice, &doc.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_drops_doc_and_list_entries() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let doc = service.create(&token, meta("notes"), None, None).await.unwrap();
        service.list(&token, ListFilter::default()).await.unwrap();
        assert_eq!(service.cache.len(), 2);

        service.delete(&token, &doc.id).await.unwrap();
        assert_eq!(service.cache.len(), 0);
    }

    #[tokio::test]
    async fn test_file_document_round_trip() {
        let (service, dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let mut file_meta = meta("photo.png");
        file_meta.file = true;
        file_meta.mime = "image/png".to_string();

        let bytes = vec![0x89u8, 0x50, 0x4e, 0x47];
        let doc = service
            .create(&token, file_meta, None, Some(bytes.clone()))
            .await
            .unwrap();

        let path = doc.file_path.clone().unwrap();
        assert!(path.starts_with(dir.path().to_str().unwrap()));
        assert!(path.ends_with(&format!("{}_photo.png", doc.id)));

        let fetched = service.get(&token, &doc.id).await.unwrap();
        let payload = service.read_payload(&fetched).await.unwrap();
        assert_eq!(payload, bytes);
    }

    #[tokio::test]
    async fn test_delete_removes_the_stored_file() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let mut file_meta = meta("data.bin");
        file_meta.file = true;
        file_meta.mime = "application/octet-stream".to_string();

        let doc = service
            .create(&token, file_meta, None, Some(b"payload".to_vec()))
            .await
            .unwrap();
        let path = doc.file_path.clone().unwrap();

        service.delete(&token, &doc.id).await.unwrap();
        assert!(tokio::fs::read(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_survives_a_missing_file() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let mut file_meta = meta("data.bin");
        file_meta.file = true;
        file_meta.mime = "application/octet-stream".to_string();

        let doc = service
            .create(&token, file_meta, None, Some(b"payload".to_vec()))
            .await
            .unwrap();

        // The payload vanished out of band; the delete still succeeds
        tokio::fs::remove_file(doc.file_path.as_deref().unwrap())
            .await
            .unwrap();
        service.delete(&token, &doc.id).await.unwrap();

        let err = service.get(&token, &doc.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_cache_entry_is_treated_as_a_miss() {
        let (service, _dir) = test_service(10).await;
        let token = open_session(&service, "alice").await;

        let doc = service.create(&token, meta("notes"), None, None).await.unwrap();

        // Poison the doc key with a list value
        service
            .cache
            .set(keys::doc_key(&doc.id), CachedValue::DocumentList(vec![]));

        let fetched = service.get(&token, &doc.id).await.unwrap();
        assert_eq!(fetched, doc);
    }
}
