use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::errors::ApiError;
use crate::state::AppState;

/// Extracts the bearer access token from `Authorization` and verifies it,
/// yielding the authenticated user's id. Refresh tokens are rejected here,
/// so they can never be replayed against protected routes.
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::MissingAuthHeader)?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or(ApiError::InvalidAuthScheme)?;

        let claims = state.tokens.verify_access(token)?;
        let user_id = claims
            .user_id()
            .ok_or(ApiError::UnknownSubject)?;

        Ok(AuthUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    async fn whoami(AuthUser(user_id): AuthUser) -> String {
        user_id.to_string()
    }

    fn test_app(state: &AppState) -> Router {
        Router::new()
            .route("/protected", get(whoami))
            .with_state(state.clone())
    }

    fn get_protected(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let state = AppState::fake();
        let resp = test_app(&state).oneshot(get_protected(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthorized() {
        let state = AppState::fake();
        let resp = test_app(&state)
            .oneshot(get_protected(Some("Basic dXNlcjpwdw==")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let state = AppState::fake();
        let resp = test_app(&state)
            .oneshot(get_protected(Some("Bearer not-a-token")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_token_is_rejected_on_protected_route() {
        let state = AppState::fake();
        let refresh = state.tokens.issue_refresh(42).unwrap();
        let resp = test_app(&state)
            .oneshot(get_protected(Some(&format!("Bearer {refresh}"))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_access_token_passes() {
        let state = AppState::fake();
        let access = state.tokens.issue_access(42, Some("a@x.com")).unwrap();
        let resp = test_app(&state)
            .oneshot(get_protected(Some(&format!("Bearer {access}"))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"42");
    }
}
