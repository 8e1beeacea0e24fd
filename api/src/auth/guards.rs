//! Role-based access guards applied as route layers.
//!
//! Each guard validates the caller and inserts the resulting `AuthUser` into
//! request extensions for handlers to pick up.

use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::auth::claims::AuthUser;
use crate::response::ApiError;

async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), ApiError> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &()).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Lets any caller with a valid token through.
pub async fn allow_authenticated(req: Request<Body>, next: Next) -> Response {
    match extract_and_insert_authuser(req).await {
        Ok((req, _user)) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

/// Lets only admin callers through.
pub async fn allow_admin(req: Request<Body>, next: Next) -> Response {
    match extract_and_insert_authuser(req).await {
        Ok((req, AuthUser(claims))) if claims.admin => next.run(req).await,
        Ok(_) => ApiError::forbidden("Admin access required").into_response(),
        Err(err) => err.into_response(),
    }
}
