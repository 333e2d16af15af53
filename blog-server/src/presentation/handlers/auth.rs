use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{HttpRequest, HttpResponse, Scope, get, post, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/auth")
        .service(register)
        .service(login)
        .service(me)
}

#[post("/register")]
async fn register(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    payload.validate()?;
    let RegisterRequest {
        username,
        email,
        password,
    } = payload.into_inner();

    let outcome = service.register(username, email, password).await?;

    info!(
        request_id = %request_id(&req),
        username = %outcome.user.username,
        "user registered"
    );

    Ok(HttpResponse::Created().json(AuthResponse::from(outcome)))
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let outcome = service.login(&payload.username, &payload.password).await?;

    info!(
        request_id = %request_id(&req),
        username = %outcome.user.username,
        "user logged in"
    );

    Ok(HttpResponse::Ok().json(AuthResponse::from(outcome)))
}

#[get("/me")]
async fn me(
    user: AuthenticatedUser,
    service: web::Data<AuthService>,
) -> Result<HttpResponse, DomainError> {
    let profile = service.get_user(user.id).await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(profile)))
}
