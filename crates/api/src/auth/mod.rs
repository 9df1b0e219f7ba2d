//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! The site has a single administrator whose credentials come from the
//! environment (see [`AdminCredentials`]).

pub mod jwt;
pub mod password;

/// Role carried in tokens issued to the administrator.
pub const ROLE_ADMIN: &str = "admin";

/// The administrator account.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// Argon2 PHC string, e.g. `$argon2id$v=19$...`.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

impl AdminCredentials {
    /// Load the administrator account from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `ADMIN_USERNAME`      | no       | `admin` |
    /// | `ADMIN_PASSWORD_HASH` | **yes**  | --      |
    ///
    /// # Panics
    ///
    /// Panics if `ADMIN_PASSWORD_HASH` is missing or is not a PHC string.
    pub fn from_env() -> Self {
        let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
        let password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .expect("ADMIN_PASSWORD_HASH must be set in the environment");
        assert!(
            argon2::password_hash::PasswordHash::new(&password_hash).is_ok(),
            "ADMIN_PASSWORD_HASH must be an argon2 PHC string"
        );

        Self {
            username,
            password_hash,
        }
    }
}
