use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ensure_owner;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::error::DomainError;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    #[instrument(skip(self, content))]
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post"));
        }
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::not_found("User"));
        }

        let comment = self
            .comments
            .create(NewComment::new(post_id, author_id, content))
            .await?;
        info!(comment_id = %comment.id, "comment added");
        Ok(comment)
    }

    /// Oldest first. An unknown post simply has no comments.
    pub async fn get_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        self.comments.find_by_post(post_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        requester_id: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), DomainError> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("Comment"))?;

        ensure_owner(
            comment.author.id,
            requester_id,
            "You can only delete your own comments",
        )?;

        if !self.comments.delete(comment_id).await? {
            return Err(DomainError::not_found("Comment"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::domain::post::NewPost;

    struct Fixture {
        store: Arc<InMemoryStore>,
        comments: CommentService,
        post_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let owner = store.add_user("owner");
        let post = PostRepository::create(
            store.as_ref(),
            NewPost::new(owner.id, "Post".into(), "body".into(), None),
        )
        .await
        .unwrap();
        let comments = CommentService::new(store.clone(), store.clone(), store.clone());
        Fixture {
            store,
            comments,
            post_id: post.id,
        }
    }

    #[tokio::test]
    async fn comments_are_listed_in_creation_order() {
        let f = fixture().await;
        let alice = f.store.add_user("alice");
        let bob = f.store.add_user("bob");

        f.comments
            .add_comment(f.post_id, alice.id, "first".into())
            .await
            .unwrap();
        f.comments
            .add_comment(f.post_id, bob.id, "second".into())
            .await
            .unwrap();

        let listed = f.comments.get_comments(f.post_id).await.unwrap();
        let contents: Vec<&str> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(listed[1].author.username, "bob");
    }

    #[tokio::test]
    async fn comment_on_missing_post_fails() {
        let f = fixture().await;
        let alice = f.store.add_user("alice");

        let err = f
            .comments
            .add_comment(Uuid::new_v4(), alice.id, "hi".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(ref m) if m == "Post not found"));
    }

    #[tokio::test]
    async fn comment_by_missing_user_fails() {
        let f = fixture().await;
        let err = f
            .comments
            .add_comment(f.post_id, Uuid::new_v4(), "hi".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn only_author_can_delete_comment() {
        let f = fixture().await;
        let alice = f.store.add_user("alice");
        let mallory = f.store.add_user("mallory");
        let comment = f
            .comments
            .add_comment(f.post_id, alice.id, "mine".into())
            .await
            .unwrap();

        let err = f
            .comments
            .delete_comment(mallory.id, f.post_id, comment.id)
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::Forbidden(ref m) if m == "You can only delete your own comments")
        );

        f.comments
            .delete_comment(alice.id, f.post_id, comment.id)
            .await
            .unwrap();
        assert!(f.comments.get_comments(f.post_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_through_wrong_post_is_not_found() {
        let f = fixture().await;
        let alice = f.store.add_user("alice");
        let comment = f
            .comments
            .add_comment(f.post_id, alice.id, "mine".into())
            .await
            .unwrap();

        let err = f
            .comments
            .delete_comment(alice.id, Uuid::new_v4(), comment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(ref m) if m == "Comment not found"));
    }

    #[tokio::test]
    async fn unknown_post_has_no_comments() {
        let f = fixture().await;
        assert!(f.comments.get_comments(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
