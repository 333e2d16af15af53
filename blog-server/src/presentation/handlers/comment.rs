use crate::application::comment_service::CommentService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CommentRequest, MessageResponse};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use tracing::info;
use uuid::Uuid;

#[post("/posts/{post_id}/comments")]
async fn add_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    payload: web::Json<CommentRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    payload.validate()?;
    let post_id = path.into_inner();

    let comment = comments
        .add_comment(post_id, user.id, payload.into_inner().content)
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post_id,
        comment_id = %comment.id,
        "comment added"
    );

    Ok(HttpResponse::Created().json(comment))
}

#[get("/posts/{post_id}/comments")]
async fn get_comments(
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let listed = comments.get_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(listed))
}

#[delete("/posts/{post_id}/comments/{comment_id}")]
async fn delete_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    comments.delete_comment(user.id, post_id, comment_id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        comment_id = %comment_id,
        "comment deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted successfully")))
}
