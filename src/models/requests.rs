//! Request DTOs for the document service API
//!
//! Defines the structure of incoming HTTP request bodies and query
//! strings.

use serde::Deserialize;

// == Register ==
/// Request body for user registration (POST /api/register).
///
/// `token` must match the configured admin token; registration is not
/// self-service.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Admin token authorizing the registration
    #[serde(default)]
    pub token: String,
    /// Login for the new user
    pub login: String,
    /// Password for the new user
    pub pswd: String,
}

// == Login ==
/// Request body for login (POST /api/auth).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub pswd: String,
}

// == Document Meta ==
/// The JSON `meta` part of a document upload (POST /api/docs).
///
/// # Fields
/// - `name`: document name shown in listings
/// - `file`: true when a binary payload accompanies the upload
/// - `public`: readable by everyone when true
/// - `mime`: MIME type of the payload
/// - `grant`: logins granted read access in addition to the owner
/// - `token`: session token; a fallback for clients that cannot set the
///   query parameter or the Authorization header
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentMeta {
    pub name: String,
    #[serde(default)]
    pub file: bool,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub mime: String,
    #[serde(default)]
    pub grant: Vec<String>,
    #[serde(default)]
    pub token: String,
}

impl DocumentMeta {
    /// Validates the meta part.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.is_empty() {
            return Some("Document name cannot be empty".to_string());
        }
        if self.file && self.mime.is_empty() {
            return Some("Binary documents must declare a mime type".to_string());
        }
        None
    }
}

// == List Query ==
/// Query parameters for document listings (GET /api/docs).
///
/// Empty strings mean "unfiltered"; `limit == 0` means unbounded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Restrict to documents owned by this login
    #[serde(default)]
    pub login: String,
    /// Field to filter on
    #[serde(default)]
    pub key: String,
    /// Value the filtered field must equal
    #[serde(default)]
    pub value: String,
    /// Maximum number of documents returned
    #[serde(default)]
    pub limit: usize,
    /// Session token (alternative to the Authorization header)
    #[serde(default)]
    pub token: Option<String>,
}
