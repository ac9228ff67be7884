//! `AuthUser` extractor: validates the bearer token and provisions the caller.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use blockshare_core::error::AppError;
use blockshare_entity::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, provisioned into the users table.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl std::ops::Deref for AuthUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::authentication("Missing or malformed Authorization header")
                })?;

        let claims = state.jwt_decoder.decode(bearer.token())?;
        tracing::debug!(
            user_id = %claims.sub,
            expires_at = ?claims.expires_at(),
            "Bearer token accepted"
        );

        let user = state
            .user_service
            .provision(claims.user_id(), &claims.email, &claims.name)
            .await?;

        Ok(AuthUser(user))
    }
}
