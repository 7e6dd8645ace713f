use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{auth::extractors::AuthUser, errors::ApiError, state::AppState};

use super::dto::{NoteCreate, NoteOut, NoteUpdate, Pagination};
use super::repo::Note;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/:id",
            patch(update_note).get(get_note).delete(delete_note),
        )
}

const MAX_TITLE_LEN: usize = 200;

#[instrument(skip(state))]
pub async fn list_notes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<NoteOut>>, ApiError> {
    let notes = Note::list_by_user(&state.db, user_id, p.limit, p.offset).await?;
    Ok(Json(notes.into_iter().map(NoteOut::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<NoteCreate>,
) -> Result<(StatusCode, Json<NoteOut>), ApiError> {
    if payload.title.len() > MAX_TITLE_LEN {
        return Err(ApiError::Validation("Title too long".into()));
    }
    let note = Note::create(&state.db, user_id, &payload.title, &payload.body, payload.done)
        .await?;
    info!(user_id, note_id = note.id, "note created");
    Ok((StatusCode::CREATED, Json(NoteOut::from(note))))
}

#[instrument(skip(state))]
pub async fn get_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<NoteOut>, ApiError> {
    let note = Note::find(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("Note"))?;
    Ok(Json(NoteOut::from(note)))
}

#[instrument(skip(state, payload))]
pub async fn update_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<NoteUpdate>,
) -> Result<Json<NoteOut>, ApiError> {
    if payload.title.as_deref().is_some_and(|t| t.len() > MAX_TITLE_LEN) {
        return Err(ApiError::Validation("Title too long".into()));
    }
    let note = Note::update(
        &state.db,
        user_id,
        id,
        payload.title.as_deref(),
        payload.body.as_deref(),
        payload.done,
    )
    .await?
    .ok_or(ApiError::NotFound("Note"))?;
    Ok(Json(NoteOut::from(note)))
}

#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !Note::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Note"));
    }
    info!(user_id, note_id = id, "note deleted");
    Ok(StatusCode::NO_CONTENT)
}
