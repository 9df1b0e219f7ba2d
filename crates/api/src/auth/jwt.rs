//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload. There
//! are no refresh tokens; the admin logs in again once a token expires.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim of every token this server signs.
pub const TOKEN_ISSUER: &str = "quill-api";

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub iss: String,
    /// Subject -- the username the token was issued to.
    pub sub: String,
    /// Role name (currently always `"admin"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry_mins", &self.access_token_expiry_mins)
            .finish()
    }
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    pub token_id: String,
}

/// Sign an access token for `subject` with the given role.
pub fn issue_access_token(
    subject: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let expires_in = config.expires_in_secs();

    let claims = Claims {
        iss: TOKEN_ISSUER.to_string(),
        sub: subject.to_string(),
        role: role.to_string(),
        exp: now + expires_in,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(IssuedToken {
        token,
        expires_in,
        token_id: claims.jti,
    })
}

/// Check signature, expiry and issuer, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 60,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    fn claims_at(now: i64, exp: i64) -> Claims {
        Claims {
            iss: TOKEN_ISSUER.to_string(),
            sub: "admin".to_string(),
            role: "admin".to_string(),
            exp,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate_access_token() {
        let config = config("test-secret-that-is-long-enough-for-hmac");
        let issued = issue_access_token("admin", "admin", &config)
            .expect("token generation should succeed");
        assert_eq!(issued.expires_in, 3600);

        let claims = validate_token(&issued.token, &config).expect("token should validate");
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.jti, issued.token_id);
    }

    #[test]
    fn test_expired_token_fails() {
        let secret = "test-secret-that-is-long-enough-for-hmac";
        let now = chrono::Utc::now().timestamp();
        // Well past the default 60-second leeway.
        let token = sign(&claims_at(now - 600, now - 300), secret);

        assert!(validate_token(&token, &config(secret)).is_err());
    }

    #[test]
    fn test_foreign_issuer_fails() {
        let secret = "shared-secret";
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: "someone-else".to_string(),
            ..claims_at(now, now + 600)
        };

        assert!(validate_token(&sign(&claims, secret), &config(secret)).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let issued = issue_access_token("admin", "admin", &config("secret-alpha"))
            .expect("token generation should succeed");

        assert!(validate_token(&issued.token, &config("secret-bravo")).is_err());
    }
}
