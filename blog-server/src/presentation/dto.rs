use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::auth_service::AuthOutcome;
use crate::application::post_service::DEFAULT_PAGE_SIZE;
use crate::domain::comment::MAX_COMMENT_LEN;
use crate::domain::error::DomainError;
use crate::domain::post::{MAX_CONTENT_LEN, MAX_TITLE_LEN};
use crate::domain::user::{MAX_EMAIL_LEN, MAX_USERNAME_LEN, User};

// ======================= AUTH =======================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        let len = self.username.trim().chars().count();
        if !(3..=MAX_USERNAME_LEN).contains(&len) {
            return Err(DomainError::Validation(format!(
                "username must be between 3 and {MAX_USERNAME_LEN} characters"
            )));
        }
        let email = self.email.trim();
        if !email.contains('@') {
            return Err(DomainError::Validation("email is invalid".into()));
        }
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(DomainError::Validation(format!(
                "email must be at most {MAX_EMAIL_LEN} characters"
            )));
        }
        if self.password.is_empty() {
            return Err(DomainError::Validation("password must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String, // "Bearer"
    pub expires_in: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<AuthOutcome> for AuthResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            access_token: outcome.token,
            token_type: "Bearer".to_string(),
            expires_in: outcome.expires_in,
            username: outcome.user.username,
            email: outcome.user.email,
            role: outcome.user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

// ======================= POSTS =======================

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

impl PostRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("title", &self.title, MAX_TITLE_LEN)?;
        require_text("content", &self.content, MAX_CONTENT_LEN)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

// ======================= COMMENTS =======================

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("content", &self.content, MAX_COMMENT_LEN)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// ======================= Utils =======================

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn require_text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be blank")));
    }
    if value.chars().count() > max {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
