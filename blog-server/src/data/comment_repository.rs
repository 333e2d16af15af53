use crate::domain::comment::{Comment, NewComment};
use crate::domain::error::DomainError;
use crate::domain::user::Author;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COMMENTS: &str = r#"
    SELECT c.id, c.post_id, c.content, c.created_at,
           u.id AS author_id, u.username AS author_username
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    author_username: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_id: row.post_id,
            author: Author {
                id: row.author_id,
                username: row.author_username,
            },
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create comment on post {}: {}", comment.post_id, e);
            DomainError::from(e)
        })?;

        info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        self.find_by_id(comment.id).await?.ok_or_else(|| {
            DomainError::Internal(format!("comment {} missing after insert", comment.id))
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let sql = format!("{SELECT_COMMENTS} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find comment {}: {}", id, e);
                DomainError::from(e)
            })?;
        Ok(row.map(Comment::from))
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let sql = format!("{SELECT_COMMENTS} WHERE c.post_id = $1 ORDER BY c.created_at ASC");
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(post_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching comments of post {}: {}", post_id, e);
                DomainError::from(e)
            })?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete comment {}: {}", id, e);
                DomainError::from(e)
            })?;

        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        info!(comment_id = %id, "comment deleted");
        Ok(true)
    }
}
