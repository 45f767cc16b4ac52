//! REST API module.
//!
//! Exposes console sessions: create, snapshot, dispatch an action, close, and CV passthrough.
//! Bodies carry the console's navigation generation, so a client can drop a response that
//! raced behind a newer one.

mod sessions;

pub use sessions::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{ConsoleError, ConsoleErrorWithGeneration};
use crate::navigator::Snapshot;
use crate::session::Session;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub generation: u64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, generation: u64) -> Self {
        Self {
            success: true,
            data,
            generation,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Errors raised before a session is found carry generation 0.
pub type ApiResult<T> = Result<ApiResponse<T>, ConsoleErrorWithGeneration>;

/// A snapshot tagged with the session it belongs to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

impl ApiResponse<SessionSnapshot> {
    /// Render the session's console as it stands now.
    pub async fn snapshot(session: &Session) -> Self {
        let state = session.state.lock().await;
        let snapshot = Snapshot::of(&state);
        let generation = snapshot.generation;
        Self::new(
            SessionSnapshot {
                session_id: session.id,
                created_at: session.created_at,
                snapshot,
            },
            generation,
        )
    }
}

/// Stamp a failure with the session's current generation. With `report` the failure is also
/// raised on the console banner.
pub async fn session_error(
    session: &Session,
    error: ConsoleError,
    report: bool,
) -> ConsoleErrorWithGeneration {
    let mut console = session.state.lock().await;
    if report {
        console.report(&error);
    }
    ConsoleErrorWithGeneration {
        error,
        generation: console.generation(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::session::SessionStore;

    #[tokio::test]
    async fn test_snapshot_envelope_tracks_generation() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create().await;
        session.state.lock().await.go_overview();

        let response = ApiResponse::snapshot(&session).await;
        assert!(response.success);
        assert_eq!(response.generation, 1);
        assert_eq!(response.data.session_id, session.id);

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["generation"], 1);
        assert_eq!(body["data"]["sessionId"], session.id.to_string());
        assert_eq!(body["data"]["view"], "overview");
    }

    #[tokio::test]
    async fn test_session_error_reports_on_banner() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create().await;

        let quiet = session_error(&session, ConsoleError::BadRequest("bad".into()), false).await;
        assert_eq!(quiet.generation, 0);
        assert!(session.state.lock().await.error.is_none());

        let err = ConsoleError::NotFound("CV not found".into());
        let reported = session_error(&session, err.clone(), true).await;
        assert_eq!(reported.error, err);
        assert_eq!(
            session.state.lock().await.error.as_deref(),
            Some("CV not found")
        );
    }
}
