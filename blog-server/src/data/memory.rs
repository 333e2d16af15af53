//! In-memory repositories backing the service and handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::category::Category;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges};
use crate::domain::user::{Author, User};

struct StoredPost {
    post: NewPost,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    categories: Vec<Category>,
    posts: Vec<StoredPost>,
    comments: Vec<NewComment>,
}

impl State {
    fn author(&self, id: Uuid) -> Result<Author, DomainError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| Author {
                id: u.id,
                username: u.username.clone(),
            })
            .ok_or_else(|| DomainError::Internal(format!("dangling author {id}")))
    }

    fn view_post(&self, stored: &StoredPost) -> Result<Post, DomainError> {
        let category = stored
            .post
            .category_id
            .and_then(|id| self.categories.iter().find(|c| c.id == id).cloned());
        Ok(Post {
            id: stored.post.id,
            title: stored.post.title.clone(),
            content: stored.post.content.clone(),
            author: self.author(stored.post.author_id)?,
            category,
            created_at: stored.post.created_at,
            updated_at: stored.updated_at,
        })
    }

    fn view_comment(&self, comment: &NewComment) -> Result<Comment, DomainError> {
        Ok(Comment {
            id: comment.id,
            post_id: comment.post_id,
            author: self.author(comment.author_id)?,
            content: comment.content.clone(),
            created_at: comment.created_at,
        })
    }

    /// Newest first, matching the SQL ordering.
    fn view_posts<'a>(
        &self,
        posts: impl Iterator<Item = &'a StoredPost>,
    ) -> Result<Vec<Post>, DomainError> {
        let mut views = posts
            .map(|p| self.view_post(p))
            .collect::<Result<Vec<_>, _>>()?;
        views.reverse();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(views)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user whose password hash is never checked.
    pub fn add_user(&self, username: &str) -> User {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "unused-hash".to_string(),
        );
        self.state.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn add_category(&self, name: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.state.lock().unwrap().categories.push(category.clone());
        category
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("Email already exists".into()));
        }
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().any(|u| u.email == email))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let mut state = self.state.lock().unwrap();
        let stored = StoredPost {
            post,
            updated_at: None,
        };
        let view = state.view_post(&stored)?;
        state.posts.push(stored);
        Ok(view)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let state = self.state.lock().unwrap();
        state
            .posts
            .iter()
            .find(|p| p.post.id == id)
            .map(|p| state.view_post(p))
            .transpose()
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.posts.iter().position(|p| p.post.id == id) else {
            return Ok(None);
        };
        let stored = &mut state.posts[index];
        stored.post.title = changes.title;
        stored.post.content = changes.content;
        if changes.category_id.is_some() {
            stored.post.category_id = changes.category_id;
        }
        stored.updated_at = Some(changes.updated_at);
        state.view_post(&state.posts[index]).map(Some)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        let before = state.posts.len();
        state.posts.retain(|p| p.post.id != id);
        let removed = state.posts.len() != before;
        if removed {
            state.comments.retain(|c| c.post_id != id);
        }
        Ok(removed)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Post>, DomainError> {
        let state = self.state.lock().unwrap();
        let views = state.view_posts(state.posts.iter())?;
        Ok(views
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn search_by_title(&self, keyword: &str) -> Result<Vec<Post>, DomainError> {
        let state = self.state.lock().unwrap();
        let needle = keyword.to_lowercase();
        state.view_posts(
            state
                .posts
                .iter()
                .filter(|p| p.post.title.to_lowercase().contains(&needle)),
        )
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        let state = self.state.lock().unwrap();
        state.view_posts(state.posts.iter().filter(|p| p.post.author_id == author_id))
    }

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, DomainError> {
        let state = self.state.lock().unwrap();
        state.view_posts(
            state
                .posts
                .iter()
                .filter(|p| p.post.category_id == Some(category_id)),
        )
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError> {
        let mut state = self.state.lock().unwrap();
        let view = state.view_comment(&comment)?;
        state.comments.push(comment);
        Ok(view)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let state = self.state.lock().unwrap();
        state
            .comments
            .iter()
            .find(|c| c.id == id)
            .map(|c| state.view_comment(c))
            .transpose()
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let state = self.state.lock().unwrap();
        state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| state.view_comment(c))
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        Ok(state.comments.len() != before)
    }
}
