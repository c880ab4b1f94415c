use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use jornada_core::bookmark::{BookmarkChange, SaveResult};
use jornada_core::models::enrollment::StudentCourse;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Discover, Saved, In Progress and Completed for courses.
pub async fn course_views(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let board = state.portal(&user).course_board().await?;
    Ok(Json(board.views()).into_response())
}

pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<BookmarkChange<StudentCourse>>, ApiError> {
    let change = state.portal(&user).toggle_course_bookmark(&id).await?;
    Ok(Json(change))
}

pub async fn save(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SaveResult<StudentCourse>>, ApiError> {
    let result = state.portal(&user).save_course(&id).await?;
    Ok(Json(result))
}
