use crate::domain::category::Category;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError>;
    async fn list(&self) -> Result<Vec<Category>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find category {}: {}", id, e);
                DomainError::from(e)
            })
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while listing categories: {}", e);
                DomainError::from(e)
            })
    }
}
