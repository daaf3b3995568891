//! Authenticated-user extractor.
//!
//! Session and cookie handling live in the fronting auth layer, which
//! injects the verified caller identity as the `x-user-id` header.
//! This extractor only reads that identity; requests without one are
//! rejected with 401.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

/// Header carrying the verified caller identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated user.
///
/// Use this in handlers to get the caller's user id:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl AuthUser {
    /// Returns the caller's user id.
    #[must_use]
    pub const fn user_id(self) -> Uuid {
        self.0
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "UNAUTHORIZED",
            "message": message
        })),
    )
        .into_response()
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
        else {
            return Err(unauthorized("Caller identity is required"));
        };

        let user_id = Uuid::parse_str(raw)
            .map_err(|_| unauthorized("Caller identity is not a valid user id"))?;

        Ok(Self(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<AuthUser, Response> {
        let (mut parts, ()) = request.into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let request = Request::builder().uri("/").body(()).unwrap();
        assert!(extract(request).await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_header_is_rejected() {
        let request = Request::builder()
            .uri("/")
            .header(USER_ID_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        assert!(extract(request).await.is_err());
    }

    #[tokio::test]
    async fn test_valid_header_yields_user_id() {
        let user_id = Uuid::now_v7();
        let request = Request::builder()
            .uri("/")
            .header(USER_ID_HEADER, user_id.to_string())
            .body(())
            .unwrap();
        let auth = extract(request).await.unwrap();
        assert_eq!(auth.user_id(), user_id);
    }
}
