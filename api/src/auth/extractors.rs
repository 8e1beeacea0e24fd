use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::extract::CookieJar;
use common::config;
use headers::Authorization;
use headers::authorization::Bearer;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::auth::claims::{AuthUser, Claims};
use crate::response::ApiError;

/// Extracts `AuthUser` from the request.
///
/// The JWT is read from the `token` cookie first, falling back to an
/// `Authorization: Bearer` header, and verified against the configured
/// secret.
///
/// # Errors
/// Returns `401 Unauthorized` when no token is present or the token is
/// invalid or expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state)
            .await
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let token_data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser(token_data.claims))
    }
}

async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    let jar = CookieJar::from_request_parts(parts, state).await.ok()?;
    if let Some(cookie) = jar.get("token") {
        return Some(cookie.value().to_owned());
    }

    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()?;
    Some(bearer.token().to_owned())
}
