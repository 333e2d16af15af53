use crate::error::BlogClientError;
use crate::models::{AuthResponse, Category, Comment, Post, PostInput, UserProfile};
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct BlogClientHttp {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[allow(dead_code)]
    message: String,
}

impl BlogClientHttp {
    pub fn connect(endpoint: &str) -> Result<Self, BlogClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            token: None,
        })
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Like `url`, but each segment is percent-encoded as a single path segment.
    fn segment_url(&self, segments: &[&str]) -> Result<Url, BlogClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BlogClientError::InvalidRequest(format!("invalid server url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| {
                BlogClientError::InvalidRequest(format!("invalid server url: {}", self.base_url))
            })?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, BlogClientError> {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(req.bearer_auth(token)),
            _ => Err(BlogClientError::Unauthorized("not logged in".to_string())),
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, BlogClientError> {
        let resp = req.send().await?;
        debug!(status = resp.status().as_u16(), url = %resp.url(), "response received");

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }

    // ======================= AUTH =======================

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, BlogClientError> {
        let req = self.client.post(self.url("/auth/register")).json(&serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        let auth: AuthResponse = self.send(req).await?;
        self.set_token(auth.access_token.clone());
        Ok(auth)
    }

    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, BlogClientError> {
        let req = self.client.post(self.url("/auth/login")).json(&serde_json::json!({
            "username": username,
            "password": password,
        }));
        let auth: AuthResponse = self.send(req).await?;
        self.set_token(auth.access_token.clone());
        Ok(auth)
    }

    pub async fn me(&self) -> Result<UserProfile, BlogClientError> {
        let req = self.authorized(self.client.get(self.url("/auth/me")))?;
        self.send(req).await
    }

    // ======================= POSTS =======================

    pub async fn list_posts(
        &self,
        page: Option<u32>,
        size: Option<u32>,
    ) -> Result<Vec<Post>, BlogClientError> {
        let req = self.client.get(self.url("/posts")).query(&[
            ("page", page.unwrap_or(0)),
            ("size", size.unwrap_or(10)),
        ]);
        self.send(req).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, BlogClientError> {
        self.send(self.client.get(self.url(&format!("/posts/{id}"))))
            .await
    }

    pub async fn search_posts(&self, keyword: &str) -> Result<Vec<Post>, BlogClientError> {
        let req = self
            .client
            .get(self.url("/posts/search"))
            .query(&[("keyword", keyword)]);
        self.send(req).await
    }

    pub async fn create_post(&self, input: &PostInput) -> Result<Post, BlogClientError> {
        let req = self.authorized(self.client.post(self.url("/posts")))?;
        self.send(req.json(input)).await
    }

    pub async fn update_post(&self, id: Uuid, input: &PostInput) -> Result<Post, BlogClientError> {
        let req = self.authorized(self.client.put(self.url(&format!("/posts/{id}"))))?;
        self.send(req.json(input)).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), BlogClientError> {
        let req = self.authorized(self.client.delete(self.url(&format!("/posts/{id}"))))?;
        self.send::<MessageResponse>(req).await.map(|_| ())
    }

    pub async fn posts_by_author(&self, username: &str) -> Result<Vec<Post>, BlogClientError> {
        let url = self.segment_url(&["users", username, "posts"])?;
        self.send(self.client.get(url)).await
    }

    // ======================= COMMENTS =======================

    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, BlogClientError> {
        self.send(self.client.get(self.url(&format!("/posts/{post_id}/comments"))))
            .await
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        content: &str,
    ) -> Result<Comment, BlogClientError> {
        let req = self.authorized(
            self.client
                .post(self.url(&format!("/posts/{post_id}/comments"))),
        )?;
        self.send(req.json(&serde_json::json!({ "content": content })))
            .await
    }

    pub async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), BlogClientError> {
        let req = self.authorized(
            self.client
                .delete(self.url(&format!("/posts/{post_id}/comments/{comment_id}"))),
        )?;
        self.send::<MessageResponse>(req).await.map(|_| ())
    }

    // ======================= CATEGORIES =======================

    pub async fn list_categories(&self) -> Result<Vec<Category>, BlogClientError> {
        self.send(self.client.get(self.url("/categories"))).await
    }

    pub async fn posts_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, BlogClientError> {
        self.send(
            self.client
                .get(self.url(&format!("/categories/{category_id}/posts"))),
        )
        .await
    }
}
