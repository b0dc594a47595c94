//! Usuario que actúa en la petición
//!
//! El cliente identifica al usuario con la cabecera `x-user-id`. Ese usuario es
//! el conductor por defecto de los viajes que registra.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::utils::errors::AppError;

pub const ACTING_USER_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTING_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(format!("Header {} requerido", ACTING_USER_HEADER))
            })?;

        Uuid::parse_str(raw.trim())
            .map(ActingUser)
            .map_err(|_| AppError::Unauthorized(format!("Header {} inválido", ACTING_USER_HEADER)))
    }
}
