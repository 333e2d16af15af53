use crate::application::category_service::CategoryService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use actix_web::{HttpResponse, get, web};
use uuid::Uuid;

#[get("/categories")]
async fn list_categories(
    categories: web::Data<CategoryService>,
) -> Result<HttpResponse, DomainError> {
    let listed = categories.list_categories().await?;
    Ok(HttpResponse::Ok().json(listed))
}

#[get("/categories/{id}/posts")]
async fn posts_by_category(
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let found = posts.posts_by_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(found))
}
