//! Service Module
//!
//! The service layer: authentication and the document orchestrator.
//! Handlers stay thin; these types own the business rules.

mod auth;
mod docs;

pub use auth::AuthService;
pub use docs::DocsService;
