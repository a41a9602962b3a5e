//! Authentication service.
//!
//! Provides password signup and login, and issues the bearer tokens that the
//! [`RequireAuth`](crate::middleware::RequireAuth) extractor checks.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{TokenError, TokenIssuer};

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use sweet_bliss_core::{Email, UserId};

use crate::db::{RepositoryError, UserStore};
use crate::models::user::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length; argon2 accepts more, but nobody needs it.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum display name length.
const MAX_NAME_LENGTH: usize = 100;

/// Authentication service.
///
/// Handles user registration, login, and token issue.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    tokens: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore, tokens: &'a TokenIssuer) -> Self {
        Self { users, tokens }
    }

    /// Register a new user with name, email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidName` if the name is blank or too long.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = validate_name(name)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        // Cheap early exit; the insert below is what actually enforces uniqueness.
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Login with email and password, returning the user and a fresh token.
    ///
    /// An unknown email, a malformed email and a wrong password are
    /// indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let Ok(email) = Email::parse(email) else {
            burn_verification(password);
            return Err(AuthError::InvalidCredentials);
        };

        let Some((user, password_hash)) = self.users.get_password_hash(&email).await? else {
            burn_verification(password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    /// Fetch the account for an authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    pub async fn get_user(&self, id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Validate and trim a display name.
fn validate_name(name: &str) -> Result<String, AuthError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(AuthError::InvalidName("name cannot be empty".to_string()));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AuthError::InvalidName(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(name.to_string())
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Run a verification against a throwaway hash so that logins for unknown
/// accounts take as long as logins with a wrong password.
fn burn_verification(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    if let Some(hash) = DUMMY_HASH.get_or_init(|| hash_password("not-a-real-password").ok()) {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::TokenConfig;
    use crate::db::memory::MemoryStore;

    fn tokens() -> TokenIssuer {
        TokenIssuer::new(&TokenConfig::new(SecretString::from(
            "k9#Qw2!zX7@vB4$nM6%tR1^yL8&pE3*j",
        )))
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Ada  ").unwrap(), "Ada");
        assert!(matches!(validate_name("   "), Err(AuthError::InvalidName(_))));
        assert!(validate_name(&"n".repeat(101)).is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        let user = auth
            .signup("Ada", "Ada@Example.com", "password123")
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "ada@example.com");

        let (logged_in, token) = auth.login("ada@example.com", "password123").await.unwrap();
        assert_eq!(logged_in, user);
        assert_eq!(tokens.verify(&token).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_any_case() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        auth.signup("Ada", "ada@example.com", "password123")
            .await
            .unwrap();
        let err = auth
            .signup("Imposter", "ADA@example.com", "password456")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);
        auth.signup("Ada", "ada@example.com", "password123")
            .await
            .unwrap();

        for (email, password) in [
            ("ada@example.com", "wrong-password"),
            ("nobody@example.com", "password123"),
            ("not-an-email", "password123"),
        ] {
            let err = auth.login(email, password).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials), "{email}");
        }
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_input_before_touching_store() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        assert!(matches!(
            auth.signup("", "ada@example.com", "password123").await,
            Err(AuthError::InvalidName(_))
        ));
        assert!(matches!(
            auth.signup("Ada", "ada", "password123").await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.signup("Ada", "ada@example.com", "short").await,
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[tokio::test]
    async fn test_store_outage_surfaces_as_repository_error() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        assert!(matches!(
            auth.login("ada@example.com", "password123").await,
            Err(AuthError::Repository(RepositoryError::Unavailable(_)))
        ));
    }
}
