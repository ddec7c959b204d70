//! Domain and API models
//!
//! Domain entities (documents, sessions, users) plus the DTOs (Data
//! Transfer Objects) used for serializing/deserializing HTTP request and
//! response bodies.

pub mod document;
pub mod requests;
pub mod responses;
pub mod session;

// Re-export commonly used types
pub use document::Document;
pub use requests::{DocumentMeta, ListQuery, LoginRequest, RegisterRequest};
pub use responses::{
    AuthResponse, DeleteResponse, DocumentResponse, ErrorResponse, HealthResponse, ListResponse,
    LogoutResponse, RegisterResponse, StatsResponse,
};
pub use session::{Session, User};
