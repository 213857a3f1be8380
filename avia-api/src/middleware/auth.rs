use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Bearer-token gate for the protected routes.
///
/// Extracts the `Authorization: Bearer ...` header, verifies the token
/// against the identity provider's published keys and injects the
/// resulting [`avia_auth::VerifiedIdentity`] into request extensions
/// for the handlers to pick up.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization header is missing".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Bearer authorization is required".to_string()))?;

    let identity = state.verifier.verify(token).await?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
