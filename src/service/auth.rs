//! Auth Service
//!
//! Registration, login and logout. Passwords are stored as argon2id PHC
//! strings; session tokens are random and opaque.

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::models::Session;
use crate::storage::{SessionStore, UserStore};

const MIN_PASSWORD_LEN: usize = 8;

// == Auth Service ==
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    admin_token: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>, admin_token: String) -> Self {
        Self {
            users,
            sessions,
            admin_token,
        }
    }

    // == Register ==
    /// Registers a new user. Requires the admin token; an empty
    /// configured token disables registration entirely.
    pub async fn register(&self, admin_token: &str, login: &str, password: &str) -> Result<()> {
        if self.admin_token.is_empty() || admin_token != self.admin_token {
            return Err(ApiError::AccessDenied);
        }

        if login.is_empty() {
            return Err(ApiError::InvalidInput("Login cannot be empty".to_string()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let hash = hash_password(password)?;
        self.users.create(login, &hash).await?;

        info!("Registered user {}", login);
        Ok(())
    }

    // == Login ==
    /// Verifies credentials and opens a session.
    ///
    /// An unknown login and a wrong password produce the same
    /// `AccessDenied`, so the response does not reveal which logins
    /// exist.
    pub async fn login(&self, login: &str, password: &str) -> Result<String> {
        let Some(user) = self.users.get_by_login(login).await? else {
            return Err(ApiError::AccessDenied);
        };

        if !verify_password(password, &user.password_hash) {
            return Err(ApiError::AccessDenied);
        }

        let token = generate_token();
        self.sessions
            .create(Session {
                token: token.clone(),
                user_id: user.id,
                login: user.login.clone(),
                created_at: Utc::now(),
            })
            .await?;

        info!("Opened session for {}", login);
        Ok(token)
    }

    // == Logout ==
    /// Closes a session. Idempotent; an unknown token is not an error.
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.delete(token).await?;
        Ok(())
    }
}

// == Password Helpers ==
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// 16 random bytes, hex-encoded: 32 characters, URL-safe.
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    hex::encode(bytes)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemorySessionStore, MemoryUserStore};

    fn test_service(admin_token: &str) -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemorySessionStore::new()),
            admin_token.to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_requires_the_admin_token() {
        let service = test_service("admin-secret");

        let err = service
            .register("wrong-token", "alice", "long-enough")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));

        service
            .register("admin-secret", "alice", "long-enough")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_admin_token_disables_registration() {
        let service = test_service("");

        // Even a matching empty token is refused
        let err = service.register("", "alice", "long-enough").await.unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));
    }

    #[tokio::test]
    async fn test_register_validates_login_and_password() {
        let service = test_service("admin-secret");

        let err = service
            .register("admin-secret", "", "long-enough")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let err = service
            .register("admin-secret", "alice", "short")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_duplicate_login_is_rejected() {
        let service = test_service("admin-secret");
        service
            .register("admin-secret", "alice", "long-enough")
            .await
            .unwrap();

        let err = service
            .register("admin-secret", "alice", "other-password")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_login_opens_a_resolvable_session() {
        let service = test_service("admin-secret");
        service
            .register("admin-secret", "alice", "long-enough")
            .await
            .unwrap();

        let token = service.login("alice", "long-enough").await.unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        let session = service.sessions.get_by_token(&token).await.unwrap().unwrap();
        assert_eq!(session.login, "alice");
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let service = test_service("admin-secret");
        service
            .register("admin-secret", "alice", "long-enough")
            .await
            .unwrap();

        let unknown_login = service.login("nobody", "long-enough").await.unwrap_err();
        let wrong_password = service.login("alice", "wrong-password").await.unwrap_err();

        assert_eq!(unknown_login.to_string(), wrong_password.to_string());
        assert!(matches!(unknown_login, ApiError::AccessDenied));
        assert!(matches!(wrong_password, ApiError::AccessDenied));
    }

    #[tokio::test]
    async fn test_each_login_gets_a_distinct_token() {
        let service = test_service("admin-secret");
        service
            .register("admin-secret", "alice", "long-enough")
            .await
            .unwrap();

        let first = service.login("alice", "long-enough").await.unwrap();
        let second = service.login("alice", "long-enough").await.unwrap();
        assert_ne!(first, second);

        // Both sessions stay valid
        assert!(service.sessions.get_by_token(&first).await.unwrap().is_some());
        assert!(service.sessions.get_by_token(&second).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let service = test_service("admin-secret");
        service
            .register("admin-secret", "alice", "long-enough")
            .await
            .unwrap();

        let token = service.login("alice", "long-enough").await.unwrap();
        service.logout(&token).await.unwrap();
        assert!(service.sessions.get_by_token(&token).await.unwrap().is_none());

        service.logout(&token).await.unwrap();
        service.logout("never-issued").await.unwrap();
    }

    #[tokio::test]
    async fn test_password_hashes_are_salted_phc_strings() {
        let service = test_service("admin-secret");
        service
            .register("admin-secret", "alice", "same-password")
            .await
            .unwrap();
        service
            .register("admin-secret", "bob", "same-password")
            .await
            .unwrap();

        let alice = service.users.get_by_login("alice").await.unwrap().unwrap();
        let bob = service.users.get_by_login("bob").await.unwrap().unwrap();

        assert!(alice.password_hash.starts_with("$argon2id$"));
        assert_ne!(alice.password_hash, bob.password_hash);
    }
}
