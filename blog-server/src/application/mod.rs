pub mod auth_service;
pub mod category_service;
pub mod comment_service;
pub mod post_service;

use uuid::Uuid;

use crate::domain::error::DomainError;

/// Only the author of a resource may change it.
pub(crate) fn ensure_owner(owner_id: Uuid, requester_id: Uuid, message: &str) -> Result<(), DomainError> {
    if owner_id != requester_id {
        Err(DomainError::Forbidden(message.to_string()))
    } else {
        Ok(())
    }
}
