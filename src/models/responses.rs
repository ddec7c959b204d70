//! Response DTOs for the document service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::models::Document;

// == Document ==
/// A document as returned to API clients.
///
/// The stored payload path is deliberately absent; payload bytes are
/// served by the document endpoint itself.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub name: String,
    pub mime: String,
    pub file: bool,
    pub public: bool,
    pub owner_login: String,
    pub grant: Vec<String>,
    /// Creation timestamp in RFC 3339 format
    pub created_at: String,
    /// Auxiliary JSON payload; omitted in listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_data: Option<serde_json::Value>,
}

impl DocumentResponse {
    /// Full view of a document, including the auxiliary JSON payload.
    pub fn detail(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            mime: doc.mime.clone(),
            file: doc.is_file,
            public: doc.public,
            owner_login: doc.owner_login.clone(),
            grant: doc.grant.clone(),
            created_at: doc.created_at.to_rfc3339(),
            json_data: doc.json_data.clone(),
        }
    }

    /// Listing view; the auxiliary JSON payload is omitted.
    pub fn summary(doc: &Document) -> Self {
        Self {
            json_data: None,
            ..Self::detail(doc)
        }
    }
}

// == List ==
/// Response body for document listings (GET /api/docs).
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub documents: Vec<DocumentResponse>,
    pub count: usize,
}

impl ListResponse {
    /// Builds the listing response; items use the summary view.
    pub fn new(docs: &[Document]) -> Self {
        let documents: Vec<DocumentResponse> =
            docs.iter().map(DocumentResponse::summary).collect();
        let count = documents.len();
        Self { documents, count }
    }
}

// == Delete ==
/// Response body for document deletion (DELETE /api/docs/:id).
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// Id of the deleted document
    pub id: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("Document '{}' deleted successfully", id),
            id,
        }
    }
}

// == Register ==
/// Response body for user registration (POST /api/register).
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    /// Success message
    pub message: String,
    /// Login of the registered user
    pub login: String,
}

impl RegisterResponse {
    /// Creates a new RegisterResponse
    pub fn new(login: impl Into<String>) -> Self {
        let login = login.into();
        Self {
            message: format!("User '{}' registered successfully", login),
            login,
        }
    }
}

// == Auth ==
/// Response body for login (POST /api/auth).
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Session token to present on subsequent requests
    pub token: String,
}

impl AuthResponse {
    /// Creates a new AuthResponse
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

// == Logout ==
/// Response body for logout (DELETE /api/auth/:token).
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    /// Success message
    pub message: String,
}

impl LogoutResponse {
    /// Creates a new LogoutResponse
    pub fn new() -> Self {
        Self {
            message: "Logged out successfully".to_string(),
        }
    }
}

impl Default for LogoutResponse {
    fn default() -> Self {
        Self::new()
    }
}

// == Stats ==
/// Response body for the stats endpoint (GET /api/stats).
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in the cache
    pub entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache counters
    pub fn new(hits: u64, misses: u64, evictions: u64, entries: usize) -> Self {
        let total_requests = hits + misses;
        let hit_rate = if total_requests > 0 {
            hits as f64 / total_requests as f64
        } else {
            0.0
        };
        Self {
            hits,
            misses,
            evictions,
            entries,
            hit_rate,
        }
    }
}

// == Health ==
/// Response body for the health endpoint (GET /api/health).
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Error ==
/// Error response body for all error conditions.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
