use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<AuthOutcome, DomainError> {
        let username = username.trim().to_string();
        let email = email.trim().to_lowercase();

        if self.repo.exists_by_username(&username).await? {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if self.repo.exists_by_email(&email).await? {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let hash =
            hash_password(&password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self.repo.create(User::new(username, email, hash)).await?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        self.issue(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthOutcome, DomainError> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or_else(DomainError::invalid_credentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::invalid_credentials())?;
        if !valid {
            warn!(username, "login rejected");
            return Err(DomainError::invalid_credentials());
        }

        info!(user_id = %user.id, "user logged in");
        self.issue(user)
    }

    fn issue(&self, user: User) -> Result<AuthOutcome, DomainError> {
        let token = self
            .keys
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok(AuthOutcome {
            user,
            token,
            expires_in: self.keys.expires_in(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::domain::user::DEFAULT_ROLE;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryStore::new()),
            JwtKeys::new("test-secret".into(), 24),
        )
    }

    #[tokio::test]
    async fn register_issues_token_with_default_role() {
        let auth = service();
        let outcome = auth
            .register("alice".into(), "a@x.com".into(), "pw".into())
            .await
            .unwrap();

        assert_eq!(outcome.user.username, "alice");
        assert_eq!(outcome.user.role, DEFAULT_ROLE);
        assert_ne!(outcome.user.password_hash, "pw");
        assert_eq!(outcome.expires_in, 24 * 3600);

        let claims = auth.keys().verify_token(&outcome.token).unwrap();
        assert_eq!(claims.sub, outcome.user.id.to_string());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let auth = service();
        auth.register("alice".into(), "a@x.com".into(), "pw".into())
            .await
            .unwrap();

        let err = auth
            .register("alice".into(), "b@y.com".into(), "pw2".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Username already exists"));
    }

    #[tokio::test]
    async fn padded_username_collides_with_existing_user() {
        let auth = service();
        auth.register("alice".into(), "a@x.com".into(), "pw".into())
            .await
            .unwrap();

        let err = auth
            .register(" alice ".into(), "b@y.com".into(), "pw".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Username already exists"));
    }

    #[tokio::test]
    async fn username_is_stored_trimmed() {
        let outcome = service()
            .register("  bob\t".into(), "b@y.com".into(), "pw".into())
            .await
            .unwrap();
        assert_eq!(outcome.user.username, "bob");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let auth = service();
        auth.register("alice".into(), "a@x.com".into(), "pw".into())
            .await
            .unwrap();

        let err = auth
            .register("bob".into(), "A@X.com".into(), "pw".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Email already exists"));
    }

    #[tokio::test]
    async fn login_with_correct_password_succeeds() {
        let auth = service();
        let registered = auth
            .register("alice".into(), "a@x.com".into(), "pw".into())
            .await
            .unwrap();

        let outcome = auth.login("alice", "pw").await.unwrap();
        assert_eq!(outcome.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let auth = service();
        auth.register("alice".into(), "a@x.com".into(), "pw".into())
            .await
            .unwrap();

        let err = auth.login("alice", "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(ref m) if m == "Invalid credentials"));
    }

    #[tokio::test]
    async fn login_with_unknown_user_fails_the_same_way() {
        let err = service().login("ghost", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(ref m) if m == "Invalid credentials"));
    }

    #[tokio::test]
    async fn get_user_reports_missing_user() {
        let err = service().get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
