//! Console session endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{session_error, ApiResponse, ApiResult, SessionSnapshot};
use crate::errors::{ConsoleError, ConsoleErrorWithGeneration};
use crate::navigator::{Action, ViewMode};
use crate::session::Session;
use crate::AppState;

/// Query parameters accepted when opening a console.
#[derive(Debug, Default, Deserialize)]
pub struct OpenQuery {
    pub view: Option<String>,
}

async fn find_session(state: &AppState, id: &str) -> Result<Arc<Session>, ConsoleError> {
    let not_found = || ConsoleError::NotFound(format!("Session {} not found", id));
    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    state.sessions.get(id).await.ok_or_else(not_found)
}

/// POST /api/sessions - Open a console, optionally deep-linked with `?view=`.
pub async fn create_session(
    State(state): State<AppState>,
    Query(query): Query<OpenQuery>,
) -> ApiResult<SessionSnapshot> {
    let initial = ViewMode::from_query(query.view.as_deref());
    let session = state.sessions.create().await;

    state.navigator.initialize(&session.state, initial).await;

    Ok(ApiResponse::snapshot(&session).await)
}

/// GET /api/sessions/:id - Current snapshot of a console.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionSnapshot> {
    let session = find_session(&state, &id).await?;
    Ok(ApiResponse::snapshot(&session).await)
}

/// POST /api/sessions/:id/actions - Apply an action and return the resulting snapshot.
///
/// A failed action still answers with the snapshot; the failure is carried in its banner
/// fields and the view is left where it was.
pub async fn dispatch_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Action>, JsonRejection>,
) -> ApiResult<SessionSnapshot> {
    let session = find_session(&state, &id).await?;

    let action = match payload {
        Ok(Json(action)) => action,
        Err(rejection) => {
            let err = ConsoleError::BadRequest(format!("Invalid action: {}", rejection.body_text()));
            return Err(session_error(&session, err, false).await);
        }
    };

    let name = action.name();
    if let Err(e) = state.navigator.dispatch(&session.state, action).await {
        tracing::info!(session = %session.id, action = name, "Action failed: {}", e);
    }

    Ok(ApiResponse::snapshot(&session).await)
}

/// DELETE /api/sessions/:id - Close a console.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let session = find_session(&state, &id).await?;

    state.sessions.remove(session.id).await;
    Ok(ApiResponse::new((), 0))
}

/// GET /api/sessions/:id/students/:student_id/cv - Stream a student's CV from the backend.
pub async fn download_cv(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(String, String)>,
) -> Result<Response, ConsoleErrorWithGeneration> {
    let session = find_session(&state, &id).await?;

    let blob = match state.navigator.backend().download_cv(&student_id).await {
        Ok(blob) => blob,
        Err(e) => return Err(session_error(&session, e, true).await),
    };

    let content_type = HeaderValue::from_str(&blob.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let file_name = blob
        .file_name
        .unwrap_or_else(|| format!("{}-cv", student_id))
        .replace('"', "");
    let disposition = HeaderValue::from_str(&format!("inline; filename=\"{}\"", file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("inline"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        blob.bytes,
    )
        .into_response())
}
