use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ensure_owner;
use crate::data::category_repository::CategoryRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            categories,
        }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))
    }

    /// Zero-based page of posts, newest first.
    pub async fn get_posts(&self, page: u32, size: u32) -> Result<Vec<Post>, DomainError> {
        let size = size.clamp(1, MAX_PAGE_SIZE) as i64;
        let offset = page as i64 * size;
        self.posts.list(size, offset).await
    }

    #[instrument(skip(self, content))]
    pub async fn create_post(
        &self,
        author_id: Uuid,
        title: String,
        content: String,
        category_id: Option<Uuid>,
    ) -> Result<Post, DomainError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::not_found("User"));
        }
        if let Some(category_id) = category_id {
            self.require_category(category_id).await?;
        }

        let post = self
            .posts
            .create(NewPost::new(author_id, title, content, category_id))
            .await?;
        info!(post_id = %post.id, "post published");
        Ok(post)
    }

    #[instrument(skip(self, content))]
    pub async fn update_post(
        &self,
        requester_id: Uuid,
        post_id: Uuid,
        title: String,
        content: String,
        category_id: Option<Uuid>,
    ) -> Result<Post, DomainError> {
        let existing = self.get_post(post_id).await?;
        ensure_owner(
            existing.author.id,
            requester_id,
            "You can only update your own posts",
        )?;
        if let Some(category_id) = category_id {
            self.require_category(category_id).await?;
        }

        let changes = PostChanges {
            title,
            content,
            category_id,
            updated_at: Utc::now(),
        };
        self.posts
            .update(post_id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, requester_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        let existing = self.get_post(post_id).await?;
        ensure_owner(
            existing.author.id,
            requester_id,
            "You can only delete your own posts",
        )?;

        if !self.posts.delete(post_id).await? {
            return Err(DomainError::not_found("Post"));
        }
        Ok(())
    }

    pub async fn search_posts(&self, keyword: &str) -> Result<Vec<Post>, DomainError> {
        self.posts.search_by_title(keyword).await
    }

    pub async fn posts_by_author(&self, username: &str) -> Result<Vec<Post>, DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))?;
        self.posts.find_by_author(author.id).await
    }

    pub async fn posts_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, DomainError> {
        self.require_category(category_id).await?;
        self.posts.find_by_category(category_id).await
    }

    async fn require_category(&self, category_id: Uuid) -> Result<(), DomainError> {
        match self.categories.find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Category")),
        }
    }
}
