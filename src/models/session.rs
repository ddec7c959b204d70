//! Session and User Models
//!
//! Authentication entities: registered users and the sessions issued to
//! them at login.

use chrono::{DateTime, Utc};

// == Session ==
/// An authenticated session.
///
/// The `login` is the authorization principal for every cache and access
/// decision made on behalf of this session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Opaque bearer token presented by the client
    pub token: String,
    /// Id of the user the session belongs to
    pub user_id: i64,
    /// Login of the user the session belongs to
    pub login: String,
    /// When the session was issued
    pub created_at: DateTime<Utc>,
}

// == User ==
/// A registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Store-assigned user id
    pub id: i64,
    /// Unique login
    pub login: String,
    /// Password hash in PHC string format
    pub password_hash: String,
    /// When the user was registered
    pub created_at: DateTime<Utc>,
}
