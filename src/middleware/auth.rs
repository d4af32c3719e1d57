use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{bearer_token, Claims};
use crate::error::ApiError;

/// Authenticated caller extracted from the bearer token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub role: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.sub,
            role: claims.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects `AuthUser`
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| ApiError::unauthorized("Invalid Authorization header format")))
        .transpose()?;

    let claims = bearer_token(header)
        .and_then(|token| state.auth.verify(token))
        .map_err(|e| {
            tracing::debug!("Rejected request to {}: {}", request.uri().path(), e);
            ApiError::from(e)
        })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!(user_id = auth_user.user_id, "authenticated request");
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Handlers take `AuthUser` as an argument; it is never defaulted.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
