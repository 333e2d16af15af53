use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::category_service::CategoryService;
use crate::application::comment_service::CommentService;
use crate::application::post_service::PostService;
use crate::data::category_repository::PostgresCategoryRepository;
use crate::data::comment_repository::PostgresCommentRepository;
use crate::data::post_repository::PostgresPostRepository;
use crate::data::user_repository::PostgresUserRepository;
use crate::domain::error::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::handlers;
use crate::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};
use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub posts: PostService,
    pub comments: CommentService,
    pub categories: CategoryService,
}

impl AppState {
    pub fn postgres(pool: PgPool, keys: JwtKeys) -> Self {
        let users = Arc::new(PostgresUserRepository::new(pool.clone()));
        let posts = Arc::new(PostgresPostRepository::new(pool.clone()));
        let comments = Arc::new(PostgresCommentRepository::new(pool.clone()));
        let categories = Arc::new(PostgresCategoryRepository::new(pool));

        Self {
            auth: AuthService::new(users.clone(), keys),
            posts: PostService::new(posts.clone(), users.clone(), categories.clone()),
            comments: CommentService::new(comments, posts, users),
            categories: CategoryService::new(categories),
        }
    }
}

/// Registers shared state, extractor error handlers and the `/api` routes.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let keys = state.auth.keys().clone();

        cfg.app_data(web::Data::new(state.auth))
            .app_data(web::Data::new(state.posts))
            .app_data(web::Data::new(state.comments))
            .app_data(web::Data::new(state.categories))
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                DomainError::Validation(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                DomainError::Validation(err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _| {
                DomainError::Validation(err.to_string()).into()
            }))
            .service(
                web::scope("/api")
                    .wrap(JwtAuthMiddleware::new(keys))
                    .route("/health", web::get().to(health))
                    .service(handlers::auth::scope())
                    // must precede /posts/{id}
                    .service(handlers::post::search_posts)
                    .service(handlers::post::get_posts)
                    .service(handlers::post::create_post)
                    .service(handlers::post::get_post)
                    .service(handlers::post::update_post)
                    .service(handlers::post::delete_post)
                    .service(handlers::post::posts_by_author)
                    .service(handlers::comment::get_comments)
                    .service(handlers::comment::add_comment)
                    .service(handlers::comment::delete_comment)
                    .service(handlers::category::list_categories)
                    .service(handlers::category::posts_by_category),
            );
    }
}

pub async fn start_rest_server(config: AppConfig, state: AppState) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        "HTTP server starting"
    );

    HttpServer::new(move || {
        let cors = build_cors(&config);

        App::new()
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .configure(configure(state.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    info!("HTTP server stopped");
    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
impl AppState {
    pub fn in_memory(store: Arc<crate::data::memory::InMemoryStore>) -> Self {
        Self {
            auth: AuthService::new(store.clone(), JwtKeys::new("test-secret".into(), 1)),
            posts: PostService::new(store.clone(), store.clone(), store.clone()),
            comments: CommentService::new(store.clone(), store.clone(), store.clone()),
            categories: CategoryService::new(store),
        }
    }
}

/// `Authorization` header value for a seeded user.
#[cfg(test)]
pub fn bearer_for(state: &AppState, user: &crate::domain::user::User) -> String {
    let token = state
        .auth
        .keys()
        .generate_token(user.id, &user.username)
        .unwrap();
    format!("Bearer {token}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    #[actix_web::test]
    async fn health_reports_ok() {
        let state = AppState::in_memory(Arc::new(InMemoryStore::new()));
        let app = test::init_service(App::new().configure(configure(state))).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/health").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn invalid_post_id_is_bad_request() {
        let state = AppState::in_memory(Arc::new(InMemoryStore::new()));
        let app = test::init_service(App::new().configure(configure(state))).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/posts/not-a-uuid").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn search_without_keyword_is_bad_request() {
        let state = AppState::in_memory(Arc::new(InMemoryStore::new()));
        let app = test::init_service(App::new().configure(configure(state))).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/posts/search").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
