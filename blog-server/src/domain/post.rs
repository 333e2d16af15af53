use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::user::Author;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_CONTENT_LEN: usize = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A post as written to storage, before author and category are joined in.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    pub fn new(author_id: Uuid, title: String, content: String, category_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id,
            title,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Replacement values for an existing post. `category_id: None` keeps the
/// current category.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}
