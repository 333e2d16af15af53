use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::middleware::{RejectedToken, RequestId};

/// The principal resolved from a bearer token by `JwtAuthMiddleware`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let extensions = req.extensions();
        if let Some(user) = extensions.get::<AuthenticatedUser>() {
            return ready(Ok(user.clone()));
        }
        let reason = extensions
            .get::<RejectedToken>()
            .map(|rejected| rejected.0.clone())
            .unwrap_or_else(|| "authentication required".into());
        ready(Err(DomainError::Unauthorized(reason)))
    }
}

pub async fn extract_user_from_token(
    token: &str,
    keys: &JwtKeys,
    auth_service: &AuthService,
) -> Result<AuthenticatedUser, DomainError> {
    let invalid = || DomainError::Unauthorized("invalid token".into());

    let claims = keys.verify_token(token).map_err(|_| invalid())?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| invalid())?;

    let user = auth_service.get_user(user_id).await.map_err(|err| match err {
        DomainError::NotFound(_) => DomainError::Unauthorized("user not found".into()),
        other => other,
    })?;

    Ok(AuthenticatedUser {
        id: user.id,
        username: user.username,
    })
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
