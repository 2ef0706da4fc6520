use crate::errors::ApiError;
use crate::models::{NoteView, NotesResponse, RangeQuery, SaveNoteRequest, SaveNoteResponse};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, Local};

/// Upsert a day's note; an empty body deletes it, mirroring how the
/// calendar's note box behaves.
pub async fn save(
    State(state): State<AppState>,
    Json(payload): Json<SaveNoteRequest>,
) -> Result<Json<SaveNoteResponse>, ApiError> {
    let content = payload.content.trim();

    if content.is_empty() {
        let deleted = state.notes.delete(payload.user_id, payload.date).await?;
        return Ok(Json(SaveNoteResponse {
            saved: false,
            deleted,
        }));
    }

    state
        .notes
        .upsert(payload.user_id, payload.date, content, Local::now().naive_local())
        .await?;

    Ok(Json(SaveNoteResponse {
        saved: true,
        deleted: false,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<NotesResponse>, ApiError> {
    let today = Local::now().date_naive();
    let start = query.start.unwrap_or(today - Duration::days(90));
    let end = query.end.unwrap_or(today);
    if start > end {
        return Err(ApiError::bad_request("start must not be after end"));
    }

    let notes = state.notes.range(query.user_id, start, end).await?;
    Ok(Json(NotesResponse {
        notes: notes
            .into_iter()
            .map(|note| NoteView {
                date: note.date,
                content: note.content,
            })
            .collect(),
    }))
}
