//! Request extractors: a JWT bearer-token extractor resolving to the
//! authenticated user's id.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use uuid::Uuid;

use super::responses::ApiResponse;
use super::AppState;

/// The authenticated caller, extracted from a `Bearer` token and verified
/// against [`crate::services::AuthService`].
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| unauthorized("missing or malformed Authorization header"))?;

        let app_state = AppState::from_ref(state);
        let user_id = app_state
            .auth_service
            .verify(bearer.token())
            .map_err(|_| unauthorized("invalid or expired token"))?;

        Ok(AuthUser(user_id))
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message.to_string())),
    )
        .into_response()
}
