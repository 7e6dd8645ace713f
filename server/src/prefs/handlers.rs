use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::{auth::extractors::AuthUser, errors::ApiError, state::AppState};

use super::dto::{PrefsOut, PrefsUpdate};
use super::repo::UserPrefs;

pub fn routes() -> Router<AppState> {
    Router::new().route("/prefs", get(get_prefs).put(put_prefs))
}

#[instrument(skip(state))]
pub async fn get_prefs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PrefsOut>, ApiError> {
    let prefs = UserPrefs::get_or_create(&state.db, user_id).await?;
    Ok(Json(PrefsOut::from(prefs)))
}

#[instrument(skip(state, payload))]
pub async fn put_prefs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<PrefsUpdate>,
) -> Result<Json<PrefsOut>, ApiError> {
    if !(1..=240).contains(&payload.sleep_minutes) {
        return Err(ApiError::Validation(
            "sleep_minutes must be between 1 and 240".into(),
        ));
    }
    let prefs = UserPrefs::upsert(&state.db, user_id, payload.sleep_minutes).await?;
    info!(user_id, sleep_minutes = prefs.sleep_minutes, "prefs updated");
    Ok(Json(PrefsOut::from(prefs)))
}
