//! API Module
//!
//! HTTP handlers and routing for the document service REST API.
//!
//! # Endpoints
//! - `POST /api/register` - Register a user (admin token required)
//! - `POST /api/auth` - Log in, returns a session token
//! - `DELETE /api/auth/:token` - Log out
//! - `POST /api/docs` - Upload a document (multipart)
//! - `GET /api/docs` - List visible documents
//! - `GET /api/docs/:id` - Fetch a document (JSON or payload bytes)
//! - `DELETE /api/docs/:id` - Delete an owned document
//! - `GET /api/stats` - Cache statistics
//! - `GET /api/health` - Health check endpoint

pub mod auth;
pub mod docs;
pub mod routes;

pub use routes::create_router;

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use serde::Deserialize;

use crate::cache::LfuCache;
use crate::config::Config;
use crate::error::StoreError;
use crate::service::{AuthService, DocsService};
use crate::storage::{LocalFileStore, MemoryDocumentStore, MemorySessionStore, MemoryUserStore};

// == App State ==
/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub docs: Arc<DocsService>,
    pub auth: Arc<AuthService>,
    pub cache: Arc<LfuCache>,
}

impl AppState {
    pub fn new(docs: Arc<DocsService>, auth: Arc<AuthService>, cache: Arc<LfuCache>) -> Self {
        Self { docs, auth, cache }
    }

    /// Wires the full service stack from configuration: in-process
    /// stores, the local file store and one shared cache.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let cache = Arc::new(LfuCache::new(config.cache_capacity));
        let sessions = Arc::new(MemorySessionStore::new());
        let files = Arc::new(LocalFileStore::new(&config.files_dir).await?);

        let docs = Arc::new(DocsService::new(
            Arc::new(MemoryDocumentStore::new()),
            sessions.clone(),
            files,
            cache.clone(),
        ));
        let auth = Arc::new(AuthService::new(
            Arc::new(MemoryUserStore::new()),
            sessions,
            config.admin_token.clone(),
        ));

        Ok(Self::new(docs, auth, cache))
    }
}

// == Token Extraction ==
/// Query string carrying an optional session token.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// Picks the session token out of a request: the `token` query
/// parameter wins, then a `Bearer` Authorization header. Returns an
/// empty string when neither is present; the service turns that into
/// an access denial.
pub fn extract_token(query_token: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(token) = query_token {
        if !token.is_empty() {
            return token.to_string();
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string()
}
