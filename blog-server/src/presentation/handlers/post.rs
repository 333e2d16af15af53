use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{ListPostsQuery, MessageResponse, PostRequest, SearchQuery};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

#[post("/posts")]
async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<PostRequest>,
) -> Result<HttpResponse, DomainError> {
    payload.validate()?;
    let PostRequest {
        title,
        content,
        category_id,
    } = payload.into_inner();

    let post = posts
        .create_post(user.id, title, content, category_id)
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

#[get("/posts")]
async fn get_posts(
    req: HttpRequest,
    posts: web::Data<PostService>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = posts.get_posts(query.page, query.size).await?;

    info!(
        request_id = %request_id(&req),
        page = query.page,
        returned = page.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(page))
}

#[get("/posts/search")]
async fn search_posts(
    posts: web::Data<PostService>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, DomainError> {
    let found = posts.search_posts(&query.keyword).await?;
    Ok(HttpResponse::Ok().json(found))
}

#[get("/posts/{id}")]
async fn get_post(
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[put("/posts/{id}")]
async fn update_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<PostRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    payload.validate()?;
    let post_id = path.into_inner();
    let PostRequest {
        title,
        content,
        category_id,
    } = payload.into_inner();

    let post = posts
        .update_post(user.id, post_id, title, content, category_id)
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
async fn delete_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    posts.delete_post(user.id, post_id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

#[get("/users/{username}/posts")]
async fn posts_by_author(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let found = posts.posts_by_author(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(found))
}
