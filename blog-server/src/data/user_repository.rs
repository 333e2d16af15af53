use crate::domain::error::DomainError;
use crate::domain::user::User;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation on `users` to the matching conflict.
fn map_insert_error(err: sqlx::Error) -> DomainError {
    let constraint = err
        .as_database_error()
        .and_then(|db| db.constraint())
        .map(str::to_owned);

    match constraint.as_deref() {
        Some("users_username_key") => DomainError::Conflict("Username already exists".into()),
        Some("users_email_key") => DomainError::Conflict("Email already exists".into()),
        _ => {
            error!("failed to create user: {}", err);
            DomainError::Internal(format!("database error: {}", err))
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find user by username {}: {}", username, e);
            DomainError::from(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find user by id {}: {}", id, e);
            DomainError::from(e)
        })
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to check username {}: {}", username, e);
                DomainError::from(e)
            })
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to check email {}: {}", email, e);
                DomainError::from(e)
            })
    }
}
