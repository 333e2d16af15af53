pub mod auth;
pub mod category;
pub mod comment;
pub mod post;
