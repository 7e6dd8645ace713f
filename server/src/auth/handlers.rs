use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, MeResponse, RefreshRequest, RefreshResponse, SignupRequest,
            TokenPairResponse, UserOut,
        },
        extractors::AuthUser,
        password::{hash_password, verify_password},
        repo::User,
    },
    errors::ApiError,
    state::AppState,
};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserOut>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "signup with invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("signup with too short password");
        return Err(ApiError::Validation("Password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "signup with taken email");
        return Err(ApiError::EmailTaken);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, payload.name.as_deref(), &payload.email, &hash)
        .await
        .map_err(|e| {
            // Two signups can race past the lookup above; the unique index
            // settles it.
            if is_unique_violation(&e) {
                ApiError::EmailTaken
            } else {
                ApiError::Database(e)
            }
        })?;

    info!(user_id = user.id, email = %user.email, "user signed up");
    Ok((StatusCode::CREATED, Json(UserOut::from(user))))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password answer identically.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login with unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let access = state
        .tokens
        .issue_access(user.id, Some(&user.email))
        .map_err(|e| ApiError::Internal(e.into()))?;
    let refresh = state
        .tokens
        .issue_refresh(user.id)
        .map_err(|e| ApiError::Internal(e.into()))?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenPairResponse::bearer(access, refresh)))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let claims = state.tokens.verify_refresh(&payload.refresh_token)?;

    // A structurally valid token whose subject no longer exists is still
    // rejected.
    let user_id = claims.user_id().ok_or(ApiError::UnknownSubject)?;
    let user = match User::find_by_id(&state.db, user_id).await? {
        Some(u) => u,
        None => {
            warn!(user_id, "refresh for deleted user");
            return Err(ApiError::UnknownSubject);
        }
    };

    let access = state
        .tokens
        .issue_access(user.id, Some(&user.email))
        .map_err(|e| ApiError::Internal(e.into()))?;

    info!(user_id = user.id, "access token refreshed");
    Ok(Json(RefreshResponse::bearer(access)))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = match User::find_by_id(&state.db, user_id).await? {
        Some(u) => u,
        None => {
            warn!(user_id, "token subject no longer exists");
            return Err(ApiError::UnknownSubject);
        }
    };

    Ok(Json(MeResponse {
        user_id: user.id,
        email: user.email,
    }))
}
