//! Typed HTTP client for the blog REST API.

mod error;
mod http_client;
mod models;

pub use error::BlogClientError;
pub use http_client::BlogClientHttp;
pub use models::{AuthResponse, Author, Category, Comment, Post, PostInput, UserProfile};
