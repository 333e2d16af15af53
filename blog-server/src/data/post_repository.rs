use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges};
use crate::domain::user::Author;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError>;
    /// Returns `false` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Post>, DomainError>;
    async fn search_by_title(&self, keyword: &str) -> Result<Vec<Post>, DomainError>;
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError>;
    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_POSTS: &str = r#"
    SELECT p.id, p.title, p.content, p.created_at, p.updated_at,
           u.id AS author_id, u.username AS author_username,
           c.id AS category_id, c.name AS category_name
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    author_id: Uuid,
    author_username: String,
    category_id: Option<Uuid>,
    category_name: Option<String>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(Category { id, name }),
            _ => None,
        };
        Post {
            id: row.id,
            title: row.title,
            content: row.content,
            author: Author {
                id: row.author_id,
                username: row.author_username,
            },
            category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Escapes LIKE metacharacters so the keyword matches literally.
pub fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn log_fetch_error(e: sqlx::Error) -> DomainError {
    error!("db error while fetching posts: {}", e);
    DomainError::from(e)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, category_id, title, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(post.category_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::from(e)
        })?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        self.find_by_id(post.id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("post {} missing after insert", post.id)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let sql = format!("{SELECT_POSTS} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::from(e)
            })?;
        Ok(row.map(Post::from))
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET
                title = $1,
                content = $2,
                category_id = COALESCE($3, category_id),
                updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(changes.category_id)
        .bind(changes.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::from(e)
        })?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        info!(post_id = %id, "post updated");
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::from(e)
            })?;

        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        info!(post_id = %id, "post deleted");
        Ok(true)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Post>, DomainError> {
        let sql = format!("{SELECT_POSTS} ORDER BY p.created_at DESC LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(log_fetch_error)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn search_by_title(&self, keyword: &str) -> Result<Vec<Post>, DomainError> {
        let sql = format!(
            r#"{SELECT_POSTS} WHERE p.title ILIKE '%' || $1 || '%' ESCAPE '\' ORDER BY p.created_at DESC"#
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(escape_like(keyword))
            .fetch_all(&self.pool)
            .await
            .map_err(log_fetch_error)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        let sql = format!("{SELECT_POSTS} WHERE p.author_id = $1 ORDER BY p.created_at DESC");
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await
            .map_err(log_fetch_error)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, DomainError> {
        let sql = format!("{SELECT_POSTS} WHERE p.category_id = $1 ORDER BY p.created_at DESC");
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(log_fetch_error)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }
}
